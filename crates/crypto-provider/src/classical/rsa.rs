//! RSA PKCS#1 v1.5 signatures over SHA-256

use rand_core::OsRng;
use rsa::pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey};
use rsa::pkcs1v15::{Signature as RsaSignature, SigningKey, VerifyingKey};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use super::{timed_sign, timed_verify};
use crate::algorithm::{AlgorithmId, Operation};
use crate::error::ProviderError;
use crate::provider::{CryptoProvider, KeyPair, KeySizes, Signature, Timed};

struct RsaKeys {
    private: RsaPrivateKey,
    signing: SigningKey<Sha256>,
    verifying: VerifyingKey<Sha256>,
}

#[derive(Debug)]
pub struct RsaProvider {
    algorithm: AlgorithmId,
    bits: usize,
}

impl RsaProvider {
    pub fn new(algorithm: AlgorithmId) -> Result<Self, ProviderError> {
        let bits = match algorithm {
            AlgorithmId::Rsa2048 => 2048,
            AlgorithmId::Rsa3072 => 3072,
            AlgorithmId::Rsa4096 => 4096,
            other => return Err(ProviderError::Unavailable(other)),
        };
        Ok(Self { algorithm, bits })
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.bits
    }

    fn keys<'a>(&self, key: &'a KeyPair) -> Result<&'a RsaKeys, ProviderError> {
        key.material::<RsaKeys>(self.algorithm)
    }
}

impl CryptoProvider for RsaProvider {
    fn algorithm(&self) -> AlgorithmId {
        self.algorithm
    }

    #[tracing::instrument(skip(self), fields(bits = self.bits))]
    fn generate_keypair(&self) -> Result<Timed<KeyPair>, ProviderError> {
        let algorithm = self.algorithm;
        let timed = Timed::measure(|| RsaPrivateKey::new(&mut OsRng, self.bits))
            .transpose()
            .map_err(|e| ProviderError::failed(algorithm, Operation::Keygen, e))?;

        Ok(timed.map(|private| {
            let verifying = VerifyingKey::<Sha256>::new(RsaPublicKey::from(&private));
            let signing = SigningKey::<Sha256>::new(private.clone());
            KeyPair::new(
                algorithm,
                RsaKeys {
                    private,
                    signing,
                    verifying,
                },
            )
        }))
    }

    fn key_sizes(&self, key: &KeyPair) -> Result<KeySizes, ProviderError> {
        let keys = self.keys(key)?;
        let encode_failed = |e: rsa::pkcs1::Error| {
            ProviderError::failed(self.algorithm, Operation::Keygen, e)
        };

        let public = RsaPublicKey::from(&keys.private)
            .to_pkcs1_der()
            .map_err(encode_failed)?;
        let secret = keys.private.to_pkcs1_der().map_err(encode_failed)?;

        Ok(KeySizes {
            public_key: public.as_bytes().len(),
            secret_key: secret.as_bytes().len(),
        })
    }

    fn sign(&self, key: &KeyPair, message: &[u8]) -> Result<Timed<Signature>, ProviderError> {
        let keys = self.keys(key)?;
        timed_sign::<_, RsaSignature>(self.algorithm, &keys.signing, message)
    }

    fn verify(
        &self,
        key: &KeyPair,
        message: &[u8],
        signature: &Signature,
    ) -> Result<Timed<bool>, ProviderError> {
        let keys = self.keys(key)?;
        timed_verify::<_, RsaSignature>(self.algorithm, &keys.verifying, message, signature)
    }
}
