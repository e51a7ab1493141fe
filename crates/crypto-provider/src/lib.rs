//! Timed cryptographic operations
//!
//! This crate wraps classical (RSA, ECDSA, ECDH) and post-quantum (Dilithium,
//! Falcon, SPHINCS+, Kyber) libraries behind one capability interface so a
//! benchmark can time key generation, signing, verification, encapsulation and
//! decapsulation without knowing which library sits underneath.

pub mod algorithm;
pub mod error;
pub mod provider;

#[cfg(feature = "classical")]
pub mod classical;
#[cfg(feature = "post-quantum")]
pub mod pq;

pub use algorithm::{AlgorithmFamily, AlgorithmId, Operation};
pub use error::ProviderError;
pub use provider::{
    provider_for, ArtifactSizes, Ciphertext, CryptoProvider, Encapsulation, KeyPair, KeySizes,
    SharedSecret, Signature, Timed,
};
