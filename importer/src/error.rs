use thiserror::Error;

/// Import failure, tagged with the stage which produced it.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("unable to read checker configuration")]
    Checker(#[source] anyhow::Error),
    #[error("unable to read interactor configuration")]
    Interactor(#[source] anyhow::Error),
    #[error("unable to read statements")]
    Statements(#[source] anyhow::Error),
    #[error("unable to read templates")]
    Templates(#[source] anyhow::Error),
    #[error("unable to read attachments (materials)")]
    Attachments(#[source] anyhow::Error),
    #[error("unable to read tests")]
    Testing(#[source] anyhow::Error),
    #[error("unable to read tutorials")]
    Editorials(#[source] anyhow::Error),
    #[error("unable to read solutions")]
    Solutions(#[source] anyhow::Error),
    #[error("unable to read scripts")]
    Scripts(#[source] anyhow::Error),
}

impl ImportError {
    /// Underlying error of the stage.
    pub fn cause(&self) -> &anyhow::Error {
        match self {
            ImportError::Checker(err)
            | ImportError::Interactor(err)
            | ImportError::Statements(err)
            | ImportError::Templates(err)
            | ImportError::Attachments(err)
            | ImportError::Testing(err)
            | ImportError::Editorials(err)
            | ImportError::Solutions(err)
            | ImportError::Scripts(err) => err,
        }
    }

    /// Returns classification failure, if this is what caused the error.
    pub fn classify_error(&self) -> Option<&ClassifyError> {
        self.cause().downcast_ref()
    }
}

/// Checker or interactor can not be expressed in terms of the snapshot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("checker \"{name}\" not supported")]
    UnsupportedChecker { name: String },
    #[error("interactor is not supported")]
    UnsupportedInteractor,
}
