//! Classical providers: RSA and ECDSA signatures, ECDH key agreement

use p256::ecdsa::signature::{SignatureEncoding, Signer, Verifier};

use crate::algorithm::{AlgorithmId, Operation};
use crate::error::ProviderError;
use crate::provider::{Signature, Timed};

pub mod ecdh;
pub mod ecdsa;
pub mod rsa;

/// Time a `signature`-crate signer and encode its output once the clock has
/// stopped.
pub(crate) fn timed_sign<K, S>(
    algorithm: AlgorithmId,
    key: &K,
    message: &[u8],
) -> Result<Timed<Signature>, ProviderError>
where
    K: Signer<S>,
    S: SignatureEncoding,
{
    Timed::measure(|| key.try_sign(message))
        .transpose()
        .map(|timed| timed.map(|sig| Signature::new(sig.to_vec())))
        .map_err(|e| ProviderError::failed(algorithm, Operation::Sign, e))
}

/// Decode `signature` and time a `signature`-crate verifier over it.
///
/// A signature that fails to decode is an error, one that decodes but does
/// not verify is `Ok(false)`.
pub(crate) fn timed_verify<K, S>(
    algorithm: AlgorithmId,
    key: &K,
    message: &[u8],
    signature: &Signature,
) -> Result<Timed<bool>, ProviderError>
where
    K: Verifier<S>,
    S: for<'a> TryFrom<&'a [u8]>,
{
    let decoded = S::try_from(signature.as_bytes()).map_err(|_| ProviderError::Malformed {
        algorithm,
        what: "signature",
    })?;

    Ok(Timed::measure(|| key.verify(message, &decoded)).map(|outcome| outcome.is_ok()))
}
