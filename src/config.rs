use std::num::{NonZeroUsize};

use serde::{Serialize, Deserialize};

/// How many threads in-place arithmetic may use.
///
/// The default is [`Threading::Single`]. Parallelism is never chosen
/// implicitly; pass a policy to one of the `*_with` methods of
/// [`Inplace`](super::Inplace).
///
/// The policy can be read from a configuration file:
/// ```
/// use mdcore::{Threading};
/// let t: Threading = serde_json::from_str(r#"{"threads": 4}"#).unwrap();
/// assert_eq!(t, Threading::threads(4));
/// ```
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Threading {
    /// Run on the calling thread.
    #[default]
    Single,

    /// Split the work into this many contiguous chunks, one per scoped thread.
    Threads(NonZeroUsize),
}

impl Threading {
    /// One thread per unit of available hardware parallelism, or
    /// [`Threading::Single`] if that cannot be determined.
    pub fn hardware() -> Self {
        let policy = std::thread::available_parallelism().map_or(Threading::Single, Threading::Threads);
        log::debug!("Hardware threading policy: {:?}", policy);
        policy
    }

    /// `n` threads. `0` means [`Threading::Single`].
    pub fn threads(n: usize) -> Self {
        NonZeroUsize::new(n).map_or(Threading::Single, Threading::Threads)
    }

    /// The number of threads this policy allows.
    pub fn count(self) -> usize {
        match self {
            Threading::Single => 1,
            Threading::Threads(n) => n.get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts() {
        assert_eq!(Threading::default(), Threading::Single);
        assert_eq!(Threading::threads(0), Threading::Single);
        assert_eq!(Threading::threads(3).count(), 3);
        assert!(Threading::hardware().count() >= 1);
    }

    #[test]
    fn serde() {
        let t: Threading = serde_json::from_str(r#""single""#).unwrap();
        assert_eq!(t, Threading::Single);
        let t: Threading = serde_json::from_str(r#"{"threads": 8}"#).unwrap();
        assert_eq!(t.count(), 8);
        assert!(serde_json::from_str::<Threading>(r#"{"threads": 0}"#).is_err());
        assert_eq!(serde_json::to_string(&Threading::threads(2)).unwrap(), r#"{"threads":2}"#);
    }
}
