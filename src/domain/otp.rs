use crate::error::DeliveryError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Lowest and highest six-digit code.
pub const OTP_MIN: u32 = 100_000;
pub const OTP_MAX: u32 = 999_999;

/// Number of distinct `PK####` package ids.
pub const PACKAGE_ID_SPACE: u16 = 10_000;

/// A one-time six-digit numeric code.
///
/// Codes are scoped to a single package. Two packages may hold the same code;
/// verification always compares against the code stored on the package itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Otp(String);

impl Otp {
    pub fn new(value: impl Into<String>) -> Result<Self, DeliveryError> {
        let value = value.into();
        let in_range = value.len() == 6
            && value
                .parse::<u32>()
                .is_ok_and(|n| (OTP_MIN..=OTP_MAX).contains(&n));
        if in_range {
            Ok(Self(value))
        } else {
            Err(DeliveryError::ValidationError(format!(
                "'{value}' is not a six-digit code"
            )))
        }
    }

    fn from_number(n: u32) -> Self {
        Self(n.clamp(OTP_MIN, OTP_MAX).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Plain string equality against what the user typed.
    pub fn matches(&self, supplied: &str) -> bool {
        self.0 == supplied
    }
}

impl TryFrom<String> for Otp {
    type Error = DeliveryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Otp> for String {
    fn from(otp: Otp) -> Self {
        otp.0
    }
}

impl fmt::Display for Otp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of access codes and package numbers.
///
/// Injected into the engine so tests can replace ambient randomness with a
/// predictable sequence.
pub trait CodeGenerator: Send + Sync {
    /// A fresh six-digit code.
    fn otp(&self) -> Otp;
    /// A package number in `0..PACKAGE_ID_SPACE`.
    fn package_number(&self) -> u16;
}

pub type CodeGeneratorBox = Box<dyn CodeGenerator>;

/// Uniformly random codes from the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn otp(&self) -> Otp {
        Otp::from_number(rand::thread_rng().gen_range(OTP_MIN..=OTP_MAX))
    }

    fn package_number(&self) -> u16 {
        rand::thread_rng().gen_range(0..PACKAGE_ID_SPACE)
    }
}

/// Counts upwards: codes `100000`, `100001`, ... and package numbers `0`, `1`, ...
#[derive(Debug, Default)]
pub struct SequentialCodeGenerator {
    next_otp: AtomicU32,
    next_package: AtomicU32,
}

impl SequentialCodeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts package numbering at `first`.
    pub fn starting_at(first: u16) -> Self {
        Self {
            next_otp: AtomicU32::new(0),
            next_package: AtomicU32::new(u32::from(first)),
        }
    }
}

impl CodeGenerator for SequentialCodeGenerator {
    fn otp(&self) -> Otp {
        let n = self.next_otp.fetch_add(1, Ordering::Relaxed);
        Otp::from_number(OTP_MIN + n % (OTP_MAX - OTP_MIN + 1))
    }

    fn package_number(&self) -> u16 {
        let n = self.next_package.fetch_add(1, Ordering::Relaxed);
        (n % u32::from(PACKAGE_ID_SPACE)) as u16
    }
}
