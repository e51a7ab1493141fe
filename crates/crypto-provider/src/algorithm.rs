//! Algorithm and operation identifiers
//!
//! Every benchmarked algorithm is named by an [`AlgorithmId`]. The string form
//! is what configuration files use and what ends up in report and plot file
//! names, so it is stable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProviderError;

/// A concrete algorithm and parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AlgorithmId {
    // Post-quantum signatures
    Dilithium2,
    Dilithium3,
    Dilithium5,
    Falcon512,
    Falcon1024,
    SphincsSha2128fSimple,
    SphincsSha2128sSimple,
    SphincsSha2192fSimple,
    SphincsShake128fSimple,
    // Classical signatures
    Rsa2048,
    Rsa3072,
    Rsa4096,
    EcdsaP256,
    EcdsaP384,
    EcdsaP521,
    // Post-quantum key encapsulation
    Kyber512,
    Kyber768,
    Kyber1024,
    // Classical key exchange
    EcdhP256,
    EcdhP384,
    EcdhP521,
}

impl AlgorithmId {
    /// All algorithms, in report order.
    pub const ALL: [AlgorithmId; 21] = [
        AlgorithmId::Dilithium2,
        AlgorithmId::Dilithium3,
        AlgorithmId::Dilithium5,
        AlgorithmId::Falcon512,
        AlgorithmId::Falcon1024,
        AlgorithmId::SphincsSha2128fSimple,
        AlgorithmId::SphincsSha2128sSimple,
        AlgorithmId::SphincsSha2192fSimple,
        AlgorithmId::SphincsShake128fSimple,
        AlgorithmId::Rsa2048,
        AlgorithmId::Rsa3072,
        AlgorithmId::Rsa4096,
        AlgorithmId::EcdsaP256,
        AlgorithmId::EcdsaP384,
        AlgorithmId::EcdsaP521,
        AlgorithmId::Kyber512,
        AlgorithmId::Kyber768,
        AlgorithmId::Kyber1024,
        AlgorithmId::EcdhP256,
        AlgorithmId::EcdhP384,
        AlgorithmId::EcdhP521,
    ];

    /// Stable identifier used in configuration and output file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmId::Dilithium2 => "dilithium2",
            AlgorithmId::Dilithium3 => "dilithium3",
            AlgorithmId::Dilithium5 => "dilithium5",
            AlgorithmId::Falcon512 => "falcon512",
            AlgorithmId::Falcon1024 => "falcon1024",
            AlgorithmId::SphincsSha2128fSimple => "sphincssha2128fsimple",
            AlgorithmId::SphincsSha2128sSimple => "sphincssha2128ssimple",
            AlgorithmId::SphincsSha2192fSimple => "sphincssha2192fsimple",
            AlgorithmId::SphincsShake128fSimple => "sphincsshake128fsimple",
            AlgorithmId::Rsa2048 => "rsa2048",
            AlgorithmId::Rsa3072 => "rsa3072",
            AlgorithmId::Rsa4096 => "rsa4096",
            AlgorithmId::EcdsaP256 => "prime256v1",
            AlgorithmId::EcdsaP384 => "secp384r1",
            AlgorithmId::EcdsaP521 => "secp521r1",
            AlgorithmId::Kyber512 => "kyber512",
            AlgorithmId::Kyber768 => "kyber768",
            AlgorithmId::Kyber1024 => "kyber1024",
            AlgorithmId::EcdhP256 => "ecdh-prime256v1",
            AlgorithmId::EcdhP384 => "ecdh-secp384r1",
            AlgorithmId::EcdhP521 => "ecdh-secp521r1",
        }
    }

    /// The family implementing this algorithm.
    pub fn family(&self) -> AlgorithmFamily {
        match self {
            AlgorithmId::Dilithium2 | AlgorithmId::Dilithium3 | AlgorithmId::Dilithium5 => {
                AlgorithmFamily::Dilithium
            }
            AlgorithmId::Falcon512 | AlgorithmId::Falcon1024 => AlgorithmFamily::Falcon,
            AlgorithmId::SphincsSha2128fSimple
            | AlgorithmId::SphincsSha2128sSimple
            | AlgorithmId::SphincsSha2192fSimple
            | AlgorithmId::SphincsShake128fSimple => AlgorithmFamily::SphincsPlus,
            AlgorithmId::Rsa2048 | AlgorithmId::Rsa3072 | AlgorithmId::Rsa4096 => {
                AlgorithmFamily::Rsa
            }
            AlgorithmId::EcdsaP256 | AlgorithmId::EcdsaP384 | AlgorithmId::EcdsaP521 => {
                AlgorithmFamily::Ecdsa
            }
            AlgorithmId::Kyber512 | AlgorithmId::Kyber768 | AlgorithmId::Kyber1024 => {
                AlgorithmFamily::Kyber
            }
            AlgorithmId::EcdhP256 | AlgorithmId::EcdhP384 | AlgorithmId::EcdhP521 => {
                AlgorithmFamily::Ecdh
            }
        }
    }

    /// Whether this algorithm's family can perform `operation`.
    pub fn supports(&self, operation: Operation) -> bool {
        self.family().supports(operation)
    }
}

impl fmt::Display for AlgorithmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmId {
    type Err = ProviderError;

    /// Parses the identifier case-insensitively. `RSA-2048` style names are
    /// accepted as well as `rsa2048`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let normalized = match normalized.strip_prefix("rsa-") {
            Some(bits) => format!("rsa{}", bits),
            None => normalized,
        };

        AlgorithmId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| ProviderError::UnknownAlgorithm(s.to_string()))
    }
}

impl TryFrom<String> for AlgorithmId {
    type Error = ProviderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AlgorithmId> for String {
    fn from(id: AlgorithmId) -> Self {
        id.as_str().to_string()
    }
}

/// Algorithm families. Each family has exactly one provider implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgorithmFamily {
    Rsa,
    Ecdsa,
    Ecdh,
    Dilithium,
    Falcon,
    SphincsPlus,
    Kyber,
}

impl AlgorithmFamily {
    /// Signature families support keygen, sign and verify.
    pub fn is_signature(&self) -> bool {
        matches!(
            self,
            AlgorithmFamily::Rsa
                | AlgorithmFamily::Ecdsa
                | AlgorithmFamily::Dilithium
                | AlgorithmFamily::Falcon
                | AlgorithmFamily::SphincsPlus
        )
    }

    /// Key-exchange families support keygen, encapsulate and decapsulate.
    pub fn is_kem(&self) -> bool {
        !self.is_signature()
    }

    pub fn is_post_quantum(&self) -> bool {
        matches!(
            self,
            AlgorithmFamily::Dilithium
                | AlgorithmFamily::Falcon
                | AlgorithmFamily::SphincsPlus
                | AlgorithmFamily::Kyber
        )
    }

    pub fn supports(&self, operation: Operation) -> bool {
        match operation {
            Operation::Keygen => true,
            Operation::Sign | Operation::Verify => self.is_signature(),
            Operation::Encapsulate | Operation::Decapsulate => self.is_kem(),
        }
    }

    /// Human-readable family name.
    pub fn name(&self) -> &'static str {
        match self {
            AlgorithmFamily::Rsa => "RSA",
            AlgorithmFamily::Ecdsa => "ECDSA",
            AlgorithmFamily::Ecdh => "ECDH",
            AlgorithmFamily::Dilithium => "Dilithium",
            AlgorithmFamily::Falcon => "Falcon",
            AlgorithmFamily::SphincsPlus => "SPHINCS+",
            AlgorithmFamily::Kyber => "Kyber",
        }
    }
}

impl fmt::Display for AlgorithmFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A timed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Operation {
    #[serde(rename = "keygen")]
    Keygen,
    #[serde(rename = "signing", alias = "sign")]
    Sign,
    #[serde(rename = "verifying", alias = "verify")]
    Verify,
    #[serde(rename = "encapsulation", alias = "encapsulate")]
    Encapsulate,
    #[serde(rename = "decapsulation", alias = "decapsulate")]
    Decapsulate,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Keygen,
        Operation::Sign,
        Operation::Verify,
        Operation::Encapsulate,
        Operation::Decapsulate,
    ];

    /// Name used in reports and plot file names.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Keygen => "keygen",
            Operation::Sign => "signing",
            Operation::Verify => "verifying",
            Operation::Encapsulate => "encapsulation",
            Operation::Decapsulate => "decapsulation",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_algorithm() -> impl Strategy<Value = AlgorithmId> {
        prop::sample::select(AlgorithmId::ALL.to_vec())
    }

    proptest! {
        /// Property: any casing of an identifier parses back to the same algorithm
        #[test]
        fn identifier_casing_is_ignored(
            algorithm in any_algorithm(),
            upper in prop::collection::vec(any::<bool>(), 32),
        ) {
            let mixed: String = algorithm
                .as_str()
                .chars()
                .zip(upper.iter().cycle())
                .map(|(c, &up)| if up { c.to_ascii_uppercase() } else { c })
                .collect();
            prop_assert_eq!(mixed.parse::<AlgorithmId>().unwrap(), algorithm);
        }

        /// Property: Display and FromStr agree, with surrounding whitespace ignored
        #[test]
        fn display_round_trips(algorithm in any_algorithm(), pad in " {0,3}") {
            let text = format!("{}{}{}", pad, algorithm, pad);
            prop_assert_eq!(text.parse::<AlgorithmId>().unwrap(), algorithm);
        }

        /// Property: every family accepts keygen and exactly one of sign or encapsulate
        #[test]
        fn family_capabilities_are_exclusive(algorithm in any_algorithm()) {
            let family = algorithm.family();
            prop_assert!(family.supports(Operation::Keygen));
            prop_assert_ne!(
                family.supports(Operation::Sign),
                family.supports(Operation::Encapsulate)
            );
        }
    }
}
