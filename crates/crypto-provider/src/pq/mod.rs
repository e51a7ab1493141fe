//! Post-quantum providers backed by the PQClean bindings
//!
//! Every parameter set in the `pqcrypto-*` crates is its own module with the
//! same free functions, so each family is generated from one of the two
//! macros below with a table mapping [`AlgorithmId`] variants to modules.
//!
//! [`AlgorithmId`]: crate::AlgorithmId

/// Generate a signature provider over a set of `pqcrypto` sign modules.
macro_rules! signature_provider {
    ($(#[$meta:meta])* $name:ident { $($id:ident => $module:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            algorithm: $crate::AlgorithmId,
        }

        impl $name {
            pub fn new(algorithm: $crate::AlgorithmId) -> Result<Self, $crate::ProviderError> {
                match algorithm {
                    $($crate::AlgorithmId::$id)|+ => Ok(Self { algorithm }),
                    other => Err($crate::ProviderError::Unavailable(other)),
                }
            }
        }

        impl $crate::CryptoProvider for $name {
            fn algorithm(&self) -> $crate::AlgorithmId {
                self.algorithm
            }

            fn generate_keypair(
                &self,
            ) -> Result<$crate::Timed<$crate::KeyPair>, $crate::ProviderError> {
                let algorithm = self.algorithm;
                match algorithm {
                    $($crate::AlgorithmId::$id => {
                        let timed = $crate::Timed::measure($module::keypair);
                        Ok(timed.map(|keys| $crate::KeyPair::new(algorithm, keys)))
                    })+
                    other => Err($crate::ProviderError::Unavailable(other)),
                }
            }

            fn key_sizes(
                &self,
                key: &$crate::KeyPair,
            ) -> Result<$crate::KeySizes, $crate::ProviderError> {
                use ::pqcrypto_traits::sign::{PublicKey as _, SecretKey as _};

                match self.algorithm {
                    $($crate::AlgorithmId::$id => {
                        let (pk, sk) = key
                            .material::<($module::PublicKey, $module::SecretKey)>(self.algorithm)?;
                        Ok($crate::KeySizes {
                            public_key: pk.as_bytes().len(),
                            secret_key: sk.as_bytes().len(),
                        })
                    })+
                    other => Err($crate::ProviderError::Unavailable(other)),
                }
            }

            fn sign(
                &self,
                key: &$crate::KeyPair,
                message: &[u8],
            ) -> Result<$crate::Timed<$crate::Signature>, $crate::ProviderError> {
                use ::pqcrypto_traits::sign::DetachedSignature as _;

                match self.algorithm {
                    $($crate::AlgorithmId::$id => {
                        let (_, sk) = key
                            .material::<($module::PublicKey, $module::SecretKey)>(self.algorithm)?;
                        let timed = $crate::Timed::measure(|| $module::detached_sign(message, sk));
                        Ok(timed.map(|sig| $crate::Signature::new(sig.as_bytes().to_vec())))
                    })+
                    other => Err($crate::ProviderError::Unavailable(other)),
                }
            }

            fn verify(
                &self,
                key: &$crate::KeyPair,
                message: &[u8],
                signature: &$crate::Signature,
            ) -> Result<$crate::Timed<bool>, $crate::ProviderError> {
                use ::pqcrypto_traits::sign::DetachedSignature as _;

                let algorithm = self.algorithm;
                match algorithm {
                    $($crate::AlgorithmId::$id => {
                        let (pk, _) = key
                            .material::<($module::PublicKey, $module::SecretKey)>(algorithm)?;
                        let sig = $module::DetachedSignature::from_bytes(signature.as_bytes())
                            .map_err(|_| $crate::ProviderError::Malformed {
                                algorithm,
                                what: "signature",
                            })?;
                        let timed = $crate::Timed::measure(|| {
                            $module::verify_detached_signature(&sig, message, pk)
                        });
                        Ok(timed.map(|outcome| outcome.is_ok()))
                    })+
                    other => Err($crate::ProviderError::Unavailable(other)),
                }
            }
        }
    };
}

/// Generate a KEM provider over a set of `pqcrypto` kem modules.
macro_rules! kem_provider {
    ($(#[$meta:meta])* $name:ident { $($id:ident => $module:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            algorithm: $crate::AlgorithmId,
        }

        impl $name {
            pub fn new(algorithm: $crate::AlgorithmId) -> Result<Self, $crate::ProviderError> {
                match algorithm {
                    $($crate::AlgorithmId::$id)|+ => Ok(Self { algorithm }),
                    other => Err($crate::ProviderError::Unavailable(other)),
                }
            }
        }

        impl $crate::CryptoProvider for $name {
            fn algorithm(&self) -> $crate::AlgorithmId {
                self.algorithm
            }

            fn generate_keypair(
                &self,
            ) -> Result<$crate::Timed<$crate::KeyPair>, $crate::ProviderError> {
                let algorithm = self.algorithm;
                match algorithm {
                    $($crate::AlgorithmId::$id => {
                        let timed = $crate::Timed::measure($module::keypair);
                        Ok(timed.map(|keys| $crate::KeyPair::new(algorithm, keys)))
                    })+
                    other => Err($crate::ProviderError::Unavailable(other)),
                }
            }

            fn key_sizes(
                &self,
                key: &$crate::KeyPair,
            ) -> Result<$crate::KeySizes, $crate::ProviderError> {
                use ::pqcrypto_traits::kem::{PublicKey as _, SecretKey as _};

                match self.algorithm {
                    $($crate::AlgorithmId::$id => {
                        let (pk, sk) = key
                            .material::<($module::PublicKey, $module::SecretKey)>(self.algorithm)?;
                        Ok($crate::KeySizes {
                            public_key: pk.as_bytes().len(),
                            secret_key: sk.as_bytes().len(),
                        })
                    })+
                    other => Err($crate::ProviderError::Unavailable(other)),
                }
            }

            fn encapsulate(
                &self,
                key: &$crate::KeyPair,
            ) -> Result<$crate::Timed<$crate::Encapsulation>, $crate::ProviderError> {
                use ::pqcrypto_traits::kem::{Ciphertext as _, SharedSecret as _};

                match self.algorithm {
                    $($crate::AlgorithmId::$id => {
                        let (pk, _) = key
                            .material::<($module::PublicKey, $module::SecretKey)>(self.algorithm)?;
                        let timed = $crate::Timed::measure(|| $module::encapsulate(pk));
                        Ok(timed.map(|(ss, ct)| $crate::Encapsulation {
                            ciphertext: $crate::Ciphertext::new(ct.as_bytes().to_vec()),
                            shared_secret: $crate::SharedSecret::new(ss.as_bytes().to_vec()),
                        }))
                    })+
                    other => Err($crate::ProviderError::Unavailable(other)),
                }
            }

            fn decapsulate(
                &self,
                key: &$crate::KeyPair,
                ciphertext: &$crate::Ciphertext,
            ) -> Result<$crate::Timed<$crate::SharedSecret>, $crate::ProviderError> {
                use ::pqcrypto_traits::kem::{Ciphertext as _, SharedSecret as _};

                let algorithm = self.algorithm;
                match algorithm {
                    $($crate::AlgorithmId::$id => {
                        let (_, sk) = key
                            .material::<($module::PublicKey, $module::SecretKey)>(algorithm)?;
                        let ct = $module::Ciphertext::from_bytes(ciphertext.as_bytes())
                            .map_err(|_| $crate::ProviderError::Malformed {
                                algorithm,
                                what: "ciphertext",
                            })?;
                        let timed = $crate::Timed::measure(|| $module::decapsulate(&ct, sk));
                        Ok(timed.map(|ss| $crate::SharedSecret::new(ss.as_bytes().to_vec())))
                    })+
                    other => Err($crate::ProviderError::Unavailable(other)),
                }
            }
        }
    };
}

pub(crate) use kem_provider;
pub(crate) use signature_provider;

pub mod dilithium;
pub mod falcon;
pub mod kyber;
pub mod sphincs;
