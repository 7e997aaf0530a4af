//! Message-based error construction shared by the workspace's error types.

/// Trait for error types that can be constructed from a plain message string.
///
/// Implement this for your crate's error type, then invoke [`impl_context!`]
/// in your error module to get `.context()` and `.with_context()` on `Result`
/// and `Option`.
pub trait FromMessage: Sized {
    fn from_message(message: String) -> Self;
}

/// Generate a crate-local `Context` trait with `.context()` and `.with_context()`
/// methods on `Result` and `Option`.
///
/// Invoke inside a module that defines `Error: FromMessage` and
/// `type Result<T> = std::result::Result<T, Error>`.
///
/// ```ignore
/// // in crates/foo/src/error.rs
/// comet_common::impl_context!();
/// ```
#[macro_export]
macro_rules! impl_context {
    () => {
        pub trait Context<T> {
            fn context(self, context: impl Into<String>) -> Result<T>;
            fn with_context<C, F>(self, f: F) -> Result<T>
            where
                C: Into<String>,
                F: FnOnce() -> C;
        }

        impl<T, E: std::fmt::Display> Context<T> for std::result::Result<T, E> {
            fn context(self, context: impl Into<String>) -> Result<T> {
                let ctx = context.into();
                self.map_err(|source| {
                    <Error as $crate::FromMessage>::from_message(format!("{ctx}: {source}"))
                })
            }

            fn with_context<C, F>(self, f: F) -> Result<T>
            where
                C: Into<String>,
                F: FnOnce() -> C,
            {
                self.map_err(|source| {
                    let ctx = f().into();
                    <Error as $crate::FromMessage>::from_message(format!("{ctx}: {source}"))
                })
            }
        }

        impl<T> Context<T> for Option<T> {
            fn context(self, context: impl Into<String>) -> Result<T> {
                self.ok_or_else(|| <Error as $crate::FromMessage>::from_message(context.into()))
            }

            fn with_context<C, F>(self, f: F) -> Result<T>
            where
                C: Into<String>,
                F: FnOnce() -> C,
            {
                self.ok_or_else(|| <Error as $crate::FromMessage>::from_message(f().into()))
            }
        }
    };
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    mod ctx {
        use thiserror::Error;

        #[derive(Debug, Error)]
        pub enum Error {
            #[error("{0}")]
            Message(String),
        }

        impl crate::FromMessage for Error {
            fn from_message(message: String) -> Self {
                Self::Message(message)
            }
        }

        pub type Result<T> = std::result::Result<T, Error>;

        crate::impl_context!();
    }

    use ctx::{Context, Error};

    #[test]
    fn context_prefixes_source_message() {
        let raw: Result<(), String> = Err("boom".into());
        let err = raw.context("loading settings").unwrap_err();
        assert_eq!(err.to_string(), "loading settings: boom");
    }

    #[test]
    fn with_context_is_lazy_on_success() {
        let ok: Result<u8, String> = Ok(3);
        let value = ok
            .with_context(|| -> String { panic!("context built for a success") })
            .unwrap();
        assert_eq!(value, 3);
    }

    #[test]
    fn option_context_uses_plain_message() {
        let missing: Option<u8> = None;
        let err = missing.with_context(|| "no value").unwrap_err();
        assert!(matches!(err, Error::Message(ref m) if m == "no value"));
    }
}
