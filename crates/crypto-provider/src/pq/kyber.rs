//! CRYSTALS-Kyber key encapsulation

use pqcrypto_kyber::{kyber1024, kyber512, kyber768};

super::kem_provider! {
    /// Kyber512, Kyber768 and Kyber1024.
    KyberProvider {
        Kyber512 => kyber512,
        Kyber768 => kyber768,
        Kyber1024 => kyber1024,
    }
}
