//! SPHINCS+ (simple instantiations)

use pqcrypto_sphincsplus::{
    sphincssha2128fsimple, sphincssha2128ssimple, sphincssha2192fsimple, sphincsshake128fsimple,
};

super::signature_provider! {
    /// SHA-2 and SHAKE instantiations. The `s` sets are slow to sign.
    SphincsProvider {
        SphincsSha2128fSimple => sphincssha2128fsimple,
        SphincsSha2128sSimple => sphincssha2128ssimple,
        SphincsSha2192fSimple => sphincssha2192fsimple,
        SphincsShake128fSimple => sphincsshake128fsimple,
    }
}
