//! Falcon

use pqcrypto_falcon::{falcon1024, falcon512};

super::signature_provider! {
    FalconProvider {
        Falcon512 => falcon512,
        Falcon1024 => falcon1024,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AlgorithmId, CryptoProvider, ProviderError, Signature};

    #[test]
    fn test_sign_then_verify() {
        let provider = FalconProvider::new(AlgorithmId::Falcon512).unwrap();
        let key = provider.generate_keypair().unwrap().value;

        let signature = provider.sign(&key, b"message").unwrap().value;
        assert!(!signature.is_empty());
        assert!(provider.verify(&key, b"message", &signature).unwrap().value);
    }

    #[test]
    fn test_key_from_other_parameter_set() {
        let small = FalconProvider::new(AlgorithmId::Falcon512).unwrap();
        let large = FalconProvider::new(AlgorithmId::Falcon1024).unwrap();
        let key = small.generate_keypair().unwrap().value;

        assert!(matches!(
            large.sign(&key, b"message"),
            Err(ProviderError::KeyMismatch(AlgorithmId::Falcon1024))
        ));
    }

    #[test]
    fn test_malformed_signature() {
        let provider = FalconProvider::new(AlgorithmId::Falcon512).unwrap();
        let key = provider.generate_keypair().unwrap().value;
        let garbage = Signature::new(vec![0u8; 4096]);

        assert!(matches!(
            provider.verify(&key, b"message", &garbage),
            Err(ProviderError::Malformed { what: "signature", .. })
        ));
    }
}
