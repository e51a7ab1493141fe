//! CRYSTALS-Dilithium (ML-DSA round 3 parameter sets)

use pqcrypto_dilithium::{dilithium2, dilithium3, dilithium5};

super::signature_provider! {
    /// Dilithium2, Dilithium3 and Dilithium5.
    DilithiumProvider {
        Dilithium2 => dilithium2,
        Dilithium3 => dilithium3,
        Dilithium5 => dilithium5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AlgorithmId, CryptoProvider, ProviderError};

    #[test]
    fn test_sign_then_verify() {
        let provider = DilithiumProvider::new(AlgorithmId::Dilithium2).unwrap();
        let key = provider.generate_keypair().unwrap().value;

        let signature = provider.sign(&key, b"latency").unwrap().value;
        assert!(provider.verify(&key, b"latency", &signature).unwrap().value);
        assert!(!provider.verify(&key, b"tampered", &signature).unwrap().value);
    }

    #[test]
    fn test_key_sizes() {
        let provider = DilithiumProvider::new(AlgorithmId::Dilithium3).unwrap();
        let key = provider.generate_keypair().unwrap().value;
        let sizes = provider.key_sizes(&key).unwrap();

        assert_eq!(sizes.public_key, dilithium3::public_key_bytes());
        assert_eq!(sizes.secret_key, dilithium3::secret_key_bytes());
    }

    #[test]
    fn test_rejects_other_family() {
        assert!(matches!(
            DilithiumProvider::new(AlgorithmId::Falcon512),
            Err(ProviderError::Unavailable(AlgorithmId::Falcon512))
        ));
    }

    #[test]
    fn test_kem_operations_unsupported() {
        let provider = DilithiumProvider::new(AlgorithmId::Dilithium2).unwrap();
        let key = provider.generate_keypair().unwrap().value;
        assert!(matches!(
            provider.encapsulate(&key),
            Err(ProviderError::Unsupported { .. })
        ));
    }
}
