//! ECDSA over the NIST prime curves

use p256::ecdsa::signature::{SignatureEncoding, Signer, Verifier};
use rand_core::OsRng;

use super::{timed_sign, timed_verify};
use crate::algorithm::AlgorithmId;
use crate::error::ProviderError;
use crate::provider::{CryptoProvider, KeyPair, KeySizes, Signature, Timed};

/// Key material is boxed as `dyn Any`, so curves must be `'static`.
trait SigningCurve: 'static {
    type SigningKey: Signer<Self::Signature> + Send + 'static;
    type VerifyingKey: Verifier<Self::Signature> + Send + 'static;
    type Signature: SignatureEncoding + for<'a> TryFrom<&'a [u8]>;

    /// Scalar length.
    const SECRET_KEY_BYTES: usize;
    /// Uncompressed SEC1 point length.
    const PUBLIC_KEY_BYTES: usize;

    fn generate() -> (Self::SigningKey, Self::VerifyingKey);
}

macro_rules! signing_curve {
    ($name:ident, $krate:ident, $secret:expr, $public:expr) => {
        struct $name;

        impl SigningCurve for $name {
            type SigningKey = ::$krate::ecdsa::SigningKey;
            type VerifyingKey = ::$krate::ecdsa::VerifyingKey;
            type Signature = ::$krate::ecdsa::Signature;

            const SECRET_KEY_BYTES: usize = $secret;
            const PUBLIC_KEY_BYTES: usize = $public;

            fn generate() -> (Self::SigningKey, Self::VerifyingKey) {
                let signing = ::$krate::ecdsa::SigningKey::random(&mut OsRng);
                let verifying = ::$krate::ecdsa::VerifyingKey::from(&signing);
                (signing, verifying)
            }
        }
    };
}

signing_curve!(P256, p256, 32, 65);
signing_curve!(P384, p384, 48, 97);
signing_curve!(P521, p521, 66, 133);

struct EcdsaKeys<C: SigningCurve> {
    signing: C::SigningKey,
    verifying: C::VerifyingKey,
}

#[derive(Debug, Clone, Copy)]
enum Curve {
    P256,
    P384,
    P521,
}

/// Dispatch a generic call on the provider's curve.
macro_rules! on_curve {
    ($curve:expr, $func:ident($($arg:expr),*)) => {
        match $curve {
            Curve::P256 => $func::<P256>($($arg),*),
            Curve::P384 => $func::<P384>($($arg),*),
            Curve::P521 => $func::<P521>($($arg),*),
        }
    };
}

#[derive(Debug)]
pub struct EcdsaProvider {
    algorithm: AlgorithmId,
    curve: Curve,
}

impl EcdsaProvider {
    pub fn new(algorithm: AlgorithmId) -> Result<Self, ProviderError> {
        let curve = match algorithm {
            AlgorithmId::EcdsaP256 => Curve::P256,
            AlgorithmId::EcdsaP384 => Curve::P384,
            AlgorithmId::EcdsaP521 => Curve::P521,
            other => return Err(ProviderError::Unavailable(other)),
        };
        Ok(Self { algorithm, curve })
    }
}

fn generate<C: SigningCurve>(algorithm: AlgorithmId) -> Timed<KeyPair> {
    Timed::measure(C::generate).map(|(signing, verifying)| {
        KeyPair::new(algorithm, EcdsaKeys::<C> { signing, verifying })
    })
}

fn sizes<C: SigningCurve>(algorithm: AlgorithmId, key: &KeyPair) -> Result<KeySizes, ProviderError> {
    key.material::<EcdsaKeys<C>>(algorithm)?;
    Ok(KeySizes {
        public_key: C::PUBLIC_KEY_BYTES,
        secret_key: C::SECRET_KEY_BYTES,
    })
}

fn sign<C: SigningCurve>(
    algorithm: AlgorithmId,
    key: &KeyPair,
    message: &[u8],
) -> Result<Timed<Signature>, ProviderError> {
    let keys = key.material::<EcdsaKeys<C>>(algorithm)?;
    timed_sign::<_, C::Signature>(algorithm, &keys.signing, message)
}

fn verify<C: SigningCurve>(
    algorithm: AlgorithmId,
    key: &KeyPair,
    message: &[u8],
    signature: &Signature,
) -> Result<Timed<bool>, ProviderError> {
    let keys = key.material::<EcdsaKeys<C>>(algorithm)?;
    timed_verify::<_, C::Signature>(algorithm, &keys.verifying, message, signature)
}

impl CryptoProvider for EcdsaProvider {
    fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    fn generate_keypair(&self) -> Result<Timed<KeyPair>, ProviderError> {
        Ok(on_curve!(self.curve, generate(self.algorithm)))
    }

    fn key_sizes(&self, key: &KeyPair) -> Result<KeySizes, ProviderError> {
        on_curve!(self.curve, sizes(self.algorithm, key))
    }

    fn sign(&self, key: &KeyPair, message: &[u8]) -> Result<Timed<Signature>, ProviderError> {
        on_curve!(self.curve, sign(self.algorithm, key, message))
    }

    fn verify(
        &self,
        key: &KeyPair,
        message: &[u8],
        signature: &Signature,
    ) -> Result<Timed<bool>, ProviderError> {
        on_curve!(self.curve, verify(self.algorithm, key, message, signature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_then_verify_every_curve() {
        for algorithm in [AlgorithmId::EcdsaP256, AlgorithmId::EcdsaP384, AlgorithmId::EcdsaP521] {
            let provider = EcdsaProvider::new(algorithm).unwrap();
            let key = provider.generate_keypair().unwrap().value;

            let signature = provider.sign(&key, b"benchmark").unwrap().value;
            assert!(provider.verify(&key, b"benchmark", &signature).unwrap().value);
            assert!(!provider.verify(&key, b"benchmarx", &signature).unwrap().value);
        }
    }

    #[test]
    fn test_fixed_width_signatures() {
        let provider = EcdsaProvider::new(AlgorithmId::EcdsaP384).unwrap();
        let key = provider.generate_keypair().unwrap().value;
        let signature = provider.sign(&key, b"m").unwrap().value;
        assert_eq!(signature.len(), 96);
    }

    #[test]
    fn test_key_sizes() {
        let provider = EcdsaProvider::new(AlgorithmId::EcdsaP256).unwrap();
        let key = provider.generate_keypair().unwrap().value;
        assert_eq!(
            provider.key_sizes(&key).unwrap(),
            KeySizes {
                public_key: 65,
                secret_key: 32
            }
        );
    }

    #[test]
    fn test_curve_mismatch() {
        let p256 = EcdsaProvider::new(AlgorithmId::EcdsaP256).unwrap();
        let p384 = EcdsaProvider::new(AlgorithmId::EcdsaP384).unwrap();
        let key = p256.generate_keypair().unwrap().value;

        assert!(matches!(
            p384.sign(&key, b"m"),
            Err(ProviderError::KeyMismatch(AlgorithmId::EcdsaP384))
        ));
    }

    #[test]
    fn test_truncated_signature() {
        let provider = EcdsaProvider::new(AlgorithmId::EcdsaP256).unwrap();
        let key = provider.generate_keypair().unwrap().value;
        assert!(matches!(
            provider.verify(&key, b"m", &Signature::new(vec![0u8; 10])),
            Err(ProviderError::Malformed { .. })
        ));
    }
}
