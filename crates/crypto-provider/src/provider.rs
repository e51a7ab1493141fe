//! The timed-operation capability interface
//!
//! A [`CryptoProvider`] wraps one algorithm family. Every operation returns
//! its output together with the elapsed monotonic time of the primitive call.
//! Input conversion happens before the clock starts and output conversion
//! after it stops, so a sample covers the library call and nothing else.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::time::{Duration, Instant};
use zeroize::Zeroizing;

use crate::algorithm::{AlgorithmFamily, AlgorithmId, Operation};
use crate::error::ProviderError;

/// An operation output together with how long the operation took.
#[derive(Debug, Clone)]
pub struct Timed<T> {
    pub value: T,
    pub elapsed: Duration,
}

impl<T> Timed<T> {
    /// Run `f` between two reads of the monotonic clock.
    pub fn measure<F>(f: F) -> Self
    where
        F: FnOnce() -> T,
    {
        let start = Instant::now();
        let value = f();
        let elapsed = start.elapsed();
        Timed { value, elapsed }
    }

    /// Convert the output, keeping the measured duration.
    pub fn map<U, F>(self, f: F) -> Timed<U>
    where
        F: FnOnce(T) -> U,
    {
        Timed {
            value: f(self.value),
            elapsed: self.elapsed,
        }
    }
}

impl<T, E> Timed<Result<T, E>> {
    /// Move a fallible output's error out of the timing wrapper.
    pub fn transpose(self) -> Result<Timed<T>, E> {
        let elapsed = self.elapsed;
        self.value.map(|value| Timed { value, elapsed })
    }
}

/// Opaque key pair handle.
///
/// Each provider stores its own native key types inside and downcasts them
/// back before the timer starts.
pub struct KeyPair {
    algorithm: AlgorithmId,
    material: Box<dyn Any + Send>,
}

impl KeyPair {
    pub fn new<K>(algorithm: AlgorithmId, material: K) -> Self
    where
        K: Any + Send,
    {
        Self {
            algorithm,
            material: Box::new(material),
        }
    }

    pub fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    /// Borrow the native key material, failing if it belongs to another
    /// algorithm or another provider.
    pub fn material<K: Any>(&self, expected: AlgorithmId) -> Result<&K, ProviderError> {
        if self.algorithm != expected {
            return Err(ProviderError::KeyMismatch(expected));
        }
        self.material
            .downcast_ref::<K>()
            .ok_or(ProviderError::KeyMismatch(expected))
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

/// A detached signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A KEM ciphertext (for ECDH, the ephemeral public point).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ciphertext(Vec<u8>);

impl Ciphertext {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Shared secret, wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct SharedSecret(Zeroizing<Vec<u8>>);

impl SharedSecret {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedSecret({} bytes)", self.0.len())
    }
}

/// Output of an encapsulation.
#[derive(Debug, Clone)]
pub struct Encapsulation {
    pub ciphertext: Ciphertext,
    pub shared_secret: SharedSecret,
}

/// Key sizes in bytes, as produced by the underlying library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySizes {
    pub public_key: usize,
    pub secret_key: usize,
}

/// Sizes of everything an algorithm produced during a benchmark, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSizes {
    pub public_key: usize,
    pub secret_key: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ciphertext: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_secret: Option<usize>,
}

impl From<KeySizes> for ArtifactSizes {
    fn from(keys: KeySizes) -> Self {
        Self {
            public_key: keys.public_key,
            secret_key: keys.secret_key,
            signature: None,
            ciphertext: None,
            shared_secret: None,
        }
    }
}

/// One implementation per algorithm family.
///
/// Operations a family cannot perform keep the default implementation, which
/// reports [`ProviderError::Unsupported`].
pub trait CryptoProvider {
    /// The algorithm this provider instance was created for.
    fn algorithm(&self) -> AlgorithmId;

    fn generate_keypair(&self) -> Result<Timed<KeyPair>, ProviderError>;

    fn key_sizes(&self, key: &KeyPair) -> Result<KeySizes, ProviderError>;

    fn sign(&self, key: &KeyPair, message: &[u8]) -> Result<Timed<Signature>, ProviderError> {
        let _ = (key, message);
        Err(self.unsupported(Operation::Sign))
    }

    fn verify(
        &self,
        key: &KeyPair,
        message: &[u8],
        signature: &Signature,
    ) -> Result<Timed<bool>, ProviderError> {
        let _ = (key, message, signature);
        Err(self.unsupported(Operation::Verify))
    }

    fn encapsulate(&self, key: &KeyPair) -> Result<Timed<Encapsulation>, ProviderError> {
        let _ = key;
        Err(self.unsupported(Operation::Encapsulate))
    }

    fn decapsulate(
        &self,
        key: &KeyPair,
        ciphertext: &Ciphertext,
    ) -> Result<Timed<SharedSecret>, ProviderError> {
        let _ = (key, ciphertext);
        Err(self.unsupported(Operation::Decapsulate))
    }

    fn unsupported(&self, operation: Operation) -> ProviderError {
        ProviderError::Unsupported {
            algorithm: self.algorithm(),
            operation,
        }
    }
}

/// Create the provider for `algorithm`.
///
/// Fails with [`ProviderError::Unavailable`] when the algorithm's family was
/// compiled out via cargo features.
pub fn provider_for(algorithm: AlgorithmId) -> Result<Box<dyn CryptoProvider>, ProviderError> {
    let provider: Box<dyn CryptoProvider> = match algorithm.family() {
        #[cfg(feature = "classical")]
        AlgorithmFamily::Rsa => Box::new(crate::classical::rsa::RsaProvider::new(algorithm)?),
        #[cfg(feature = "classical")]
        AlgorithmFamily::Ecdsa => Box::new(crate::classical::ecdsa::EcdsaProvider::new(algorithm)?),
        #[cfg(feature = "classical")]
        AlgorithmFamily::Ecdh => Box::new(crate::classical::ecdh::EcdhProvider::new(algorithm)?),
        #[cfg(feature = "post-quantum")]
        AlgorithmFamily::Dilithium => {
            Box::new(crate::pq::dilithium::DilithiumProvider::new(algorithm)?)
        }
        #[cfg(feature = "post-quantum")]
        AlgorithmFamily::Falcon => Box::new(crate::pq::falcon::FalconProvider::new(algorithm)?),
        #[cfg(feature = "post-quantum")]
        AlgorithmFamily::SphincsPlus => {
            Box::new(crate::pq::sphincs::SphincsProvider::new(algorithm)?)
        }
        #[cfg(feature = "post-quantum")]
        AlgorithmFamily::Kyber => Box::new(crate::pq::kyber::KyberProvider::new(algorithm)?),
        #[allow(unreachable_patterns)]
        _ => return Err(ProviderError::Unavailable(algorithm)),
    };

    tracing::debug!(%algorithm, family = %algorithm.family(), "Initialised provider");
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_measure_records_elapsed() {
        let timed = Timed::measure(|| {
            std::thread::sleep(Duration::from_millis(2));
            42
        });
        assert_eq!(timed.value, 42);
        assert!(timed.elapsed >= Duration::from_millis(2));
    }

    #[test]
    fn test_timed_map_keeps_duration() {
        let timed = Timed {
            value: 3,
            elapsed: Duration::from_micros(7),
        };
        let mapped = timed.map(|v| v * 2);
        assert_eq!(mapped.value, 6);
        assert_eq!(mapped.elapsed, Duration::from_micros(7));
    }

    #[test]
    fn test_timed_transpose() {
        let ok: Timed<Result<u8, &str>> = Timed {
            value: Ok(1),
            elapsed: Duration::from_nanos(5),
        };
        assert_eq!(ok.transpose().unwrap().value, 1);

        let err: Timed<Result<u8, &str>> = Timed {
            value: Err("boom"),
            elapsed: Duration::from_nanos(5),
        };
        assert_eq!(err.transpose().unwrap_err(), "boom");
    }

    #[test]
    fn test_key_material_downcast() {
        let key = KeyPair::new(AlgorithmId::Kyber512, 17u32);
        assert_eq!(*key.material::<u32>(AlgorithmId::Kyber512).unwrap(), 17);

        assert!(matches!(
            key.material::<u64>(AlgorithmId::Kyber512),
            Err(ProviderError::KeyMismatch(AlgorithmId::Kyber512))
        ));
        assert!(matches!(
            key.material::<u32>(AlgorithmId::Kyber768),
            Err(ProviderError::KeyMismatch(AlgorithmId::Kyber768))
        ));
    }

    #[test]
    fn test_shared_secret_debug_hides_bytes() {
        let secret = SharedSecret::new(vec![0xAA; 32]);
        assert_eq!(format!("{:?}", secret), "SharedSecret(32 bytes)");
    }

    fn compiled_in(family: AlgorithmFamily) -> bool {
        match family {
            AlgorithmFamily::Rsa | AlgorithmFamily::Ecdsa | AlgorithmFamily::Ecdh => {
                cfg!(feature = "classical")
            }
            _ => cfg!(feature = "post-quantum"),
        }
    }

    #[test]
    fn test_compiled_in_algorithms_have_a_provider() {
        for algorithm in AlgorithmId::ALL {
            match provider_for(algorithm) {
                Ok(provider) => {
                    assert!(compiled_in(algorithm.family()));
                    assert_eq!(provider.algorithm(), algorithm);
                }
                Err(err) => {
                    assert!(!compiled_in(algorithm.family()), "{}: {}", algorithm, err);
                    assert!(matches!(err, ProviderError::Unavailable(a) if a == algorithm));
                }
            }
        }
    }
}
