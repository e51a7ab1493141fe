//! ECDH over the NIST prime curves, driven as a KEM
//!
//! Key generation creates the static key pair. Encapsulation generates an
//! ephemeral key and derives the shared secret against the static public key;
//! the ephemeral public point (SEC1 uncompressed) is the ciphertext.
//! Decapsulation derives the same secret from the static secret key.

use rand_core::OsRng;

use crate::algorithm::AlgorithmId;
use crate::error::ProviderError;
use crate::provider::{
    Ciphertext, CryptoProvider, Encapsulation, KeyPair, KeySizes, SharedSecret, Timed,
};

trait ExchangeCurve {
    type SecretKey: Send + 'static;

    const SECRET_KEY_BYTES: usize;
    const PUBLIC_KEY_BYTES: usize;

    fn generate() -> Timed<Self::SecretKey>;

    fn encapsulate(key: &Self::SecretKey) -> Timed<Encapsulation>;

    /// `None` when the ciphertext is not a valid point on the curve.
    fn decapsulate(key: &Self::SecretKey, ciphertext: &[u8]) -> Option<Timed<SharedSecret>>;
}

macro_rules! exchange_curve {
    ($name:ident, $krate:ident, $secret:expr, $public:expr) => {
        struct $name;

        impl ExchangeCurve for $name {
            type SecretKey = ::$krate::SecretKey;

            const SECRET_KEY_BYTES: usize = $secret;
            const PUBLIC_KEY_BYTES: usize = $public;

            fn generate() -> Timed<Self::SecretKey> {
                Timed::measure(|| ::$krate::SecretKey::random(&mut OsRng))
            }

            fn encapsulate(key: &Self::SecretKey) -> Timed<Encapsulation> {
                let peer = key.public_key();
                Timed::measure(|| {
                    let ephemeral = ::$krate::ecdh::EphemeralSecret::random(&mut OsRng);
                    let shared = ephemeral.diffie_hellman(&peer);
                    (ephemeral.public_key(), shared)
                })
                .map(|(public, shared)| Encapsulation {
                    ciphertext: Ciphertext::new(public.to_sec1_bytes().to_vec()),
                    shared_secret: SharedSecret::new(shared.raw_secret_bytes().to_vec()),
                })
            }

            fn decapsulate(
                key: &Self::SecretKey,
                ciphertext: &[u8],
            ) -> Option<Timed<SharedSecret>> {
                let public = ::$krate::PublicKey::from_sec1_bytes(ciphertext).ok()?;
                let timed = Timed::measure(|| {
                    ::$krate::ecdh::diffie_hellman(key.to_nonzero_scalar(), public.as_affine())
                });
                Some(timed.map(|shared| SharedSecret::new(shared.raw_secret_bytes().to_vec())))
            }
        }
    };
}

exchange_curve!(P256, p256, 32, 65);
exchange_curve!(P384, p384, 48, 97);
exchange_curve!(P521, p521, 66, 133);

#[derive(Debug, Clone, Copy)]
enum Curve {
    P256,
    P384,
    P521,
}

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
pub struct EcdhProvider {
    algorithm: AlgorithmId,
    curve: Curve,
}

impl EcdhProvider {
    pub fn new(algorithm: AlgorithmId) -> Result<Self, ProviderError> {
        let curve = match algorithm {
            AlgorithmId::EcdhP256 => Curve::P256,
            AlgorithmId::EcdhP384 => Curve::P384,
            AlgorithmId::EcdhP521 => Curve::P521,
            other => return Err(ProviderError::Unavailable(other)),
        };
        Ok(Self { algorithm, curve })
    }
}

fn generate<C: ExchangeCurve>(algorithm: AlgorithmId) -> Timed<KeyPair> {
    C::generate().map(|secret| KeyPair::new(algorithm, secret))
}

fn sizes<C: ExchangeCurve>(algorithm: AlgorithmId, key: &KeyPair) -> Result<KeySizes, ProviderError> {
    key.material::<C::SecretKey>(algorithm)?;
    Ok(KeySizes {
        public_key: C::PUBLIC_KEY_BYTES,
        secret_key: C::SECRET_KEY_BYTES,
    })
}

fn encapsulate<C: ExchangeCurve>(
    algorithm: AlgorithmId,
    key: &KeyPair,
) -> Result<Timed<Encapsulation>, ProviderError> {
    let secret = key.material::<C::SecretKey>(algorithm)?;
    Ok(C::encapsulate(secret))
}

fn decapsulate<C: ExchangeCurve>(
    algorithm: AlgorithmId,
    key: &KeyPair,
    ciphertext: &Ciphertext,
) -> Result<Timed<SharedSecret>, ProviderError> {
    let secret = key.material::<C::SecretKey>(algorithm)?;
    C::decapsulate(secret, ciphertext.as_bytes()).ok_or(ProviderError::Malformed {
        algorithm,
        what: "ciphertext",
    })
}

impl CryptoProvider for EcdhProvider {
    fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    fn generate_keypair(&self) -> Result<Timed<KeyPair>, ProviderError> {
        Ok(on_curve!(self.curve, generate(self.algorithm)))
    }

    fn key_sizes(&self, key: &KeyPair) -> Result<KeySizes, ProviderError> {
        on_curve!(self.curve, sizes(self.algorithm, key))
    }

    fn encapsulate(&self, key: &KeyPair) -> Result<Timed<Encapsulation>, ProviderError> {
        on_curve!(self.curve, encapsulate(self.algorithm, key))
    }

    fn decapsulate(
        &self,
        key: &KeyPair,
        ciphertext: &Ciphertext,
    ) -> Result<Timed<SharedSecret>, ProviderError> {
        on_curve!(self.curve, decapsulate(self.algorithm, key, ciphertext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_sides_agree() {
        for algorithm in [AlgorithmId::EcdhP256, AlgorithmId::EcdhP384, AlgorithmId::EcdhP521] {
            let provider = EcdhProvider::new(algorithm).unwrap();
            let key = provider.generate_keypair().unwrap().value;

            let encapsulation = provider.encapsulate(&key).unwrap().value;
            let recovered = provider
                .decapsulate(&key, &encapsulation.ciphertext)
                .unwrap()
                .value;
            assert_eq!(recovered, encapsulation.shared_secret);
        }
    }

    #[test]
    fn test_ciphertext_is_uncompressed_point() {
        let provider = EcdhProvider::new(AlgorithmId::EcdhP256).unwrap();
        let key = provider.generate_keypair().unwrap().value;
        let encapsulation = provider.encapsulate(&key).unwrap().value;

        assert_eq!(encapsulation.ciphertext.len(), 65);
        assert_eq!(encapsulation.ciphertext.as_bytes()[0], 0x04);
        assert_eq!(encapsulation.shared_secret.as_bytes().len(), 32);
    }

    #[test]
    fn test_invalid_point() {
        let provider = EcdhProvider::new(AlgorithmId::EcdhP384).unwrap();
        let key = provider.generate_keypair().unwrap().value;

        assert!(matches!(
            provider.decapsulate(&key, &Ciphertext::new(vec![0x04; 97])),
            Err(ProviderError::Malformed { what: "ciphertext", .. })
        ));
    }

    #[test]
    fn test_signing_unsupported() {
        let provider = EcdhProvider::new(AlgorithmId::EcdhP521).unwrap();
        let key = provider.generate_keypair().unwrap().value;
        assert!(matches!(
            provider.sign(&key, b"m"),
            Err(ProviderError::Unsupported { .. })
        ));
    }
}
