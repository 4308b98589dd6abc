use thiserror::Error;

pub type Result<T> = std::result::Result<T, SetupError>;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum SetupError {
    /// 没有可用的连接地址，消息直接展示给用户
    #[error("{0}")]
    Unconfigured(String),

    #[error("{backend} backend failure: {source}")]
    BackendFailure {
        backend: &'static str,
        #[source]
        source: BoxError,
    },
}

impl SetupError {
    pub fn backend(backend: &'static str, source: impl Into<BoxError>) -> Self {
        SetupError::BackendFailure {
            backend,
            source: source.into(),
        }
    }

    pub fn is_unconfigured(&self) -> bool {
        matches!(self, SetupError::Unconfigured(_))
    }
}

impl From<mongodb::error::Error> for SetupError {
    fn from(e: mongodb::error::Error) -> Self {
        SetupError::backend("mongodb", e)
    }
}

impl From<sqlx::Error> for SetupError {
    fn from(e: sqlx::Error) -> Self {
        SetupError::backend("sql", e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_displays_message_verbatim() {
        let err = SetupError::Unconfigured("No MongoDB URI provided.".to_string());
        assert_eq!(err.to_string(), "No MongoDB URI provided.");
        assert!(err.is_unconfigured());
    }

    #[test]
    fn backend_failure_keeps_source() {
        let err = SetupError::from(sqlx::Error::PoolTimedOut);
        assert!(!err.is_unconfigured());
        assert!(err.to_string().starts_with("sql backend failure:"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
