//! Header codec properties over randomized parameter sets.

use coffer::{CofferError, Params};
use rand::{Rng, RngCore};

fn random_params(rng: &mut impl Rng) -> Params {
    let salt_len = rng.random_range(1..=32usize);
    let mut salt = vec![0u8; salt_len];
    rng.fill_bytes(&mut salt);

    let mut params = Params {
        salt: Some(salt),
        argon_time: rng.random_range(1..=u32::MAX),
        argon_memory: rng.random_range(1..=u32::MAX),
        argon_threads: rng.random_range(1..=u8::MAX),
        chunk_size: rng.random_range(1..=i64::MAX),
        ..Params::default()
    };
    params.check().unwrap();
    params
}

#[test]
fn test_parse_marshal_identity_on_random_headers() {
    let mut rng = rand::rng();
    for _ in 0..200 {
        let mut params = random_params(&mut rng);
        let header = params.marshal_header().unwrap();

        let mut parsed = Params::parse_header(&mut header.as_slice()).unwrap();
        assert_eq!(parsed, params, "header {:?}", String::from_utf8_lossy(&header));

        let remarshalled = parsed.marshal_header().unwrap();
        assert_eq!(remarshalled, header);
    }
}

#[test]
fn test_parse_leaves_body_bytes_untouched() {
    let mut rng = rand::rng();
    let mut params = random_params(&mut rng);
    let mut container = params.marshal_header().unwrap();
    let body = [0xABu8; 64];
    container.extend_from_slice(&body);

    let mut src = container.as_slice();
    Params::parse_header(&mut src).unwrap();
    assert_eq!(src, body);
}

#[test]
fn test_bit_flips_in_header_never_parse_as_original() {
    // Any single-bit mutation either fails to parse or parses to a
    // different parameter set; it can never silently reproduce the
    // original.
    let mut params = Params {
        salt: Some(vec![0, 1, 2, 3, 4]),
        ..Params::default()
    };
    let header = params.marshal_header().unwrap();

    for byte in 0..header.len() {
        for bit in 0..8 {
            let mut mutated = header.clone();
            mutated[byte] ^= 1 << bit;
            match Params::parse_header(&mut mutated.as_slice()) {
                Ok(parsed) => assert_ne!(
                    parsed, params,
                    "mutation at byte {byte}, bit {bit} parsed as the original"
                ),
                Err(CofferError::Parsing(_))
                | Err(CofferError::ArgonType)
                | Err(CofferError::ArgonVersion)
                | Err(CofferError::ArgonTime)
                | Err(CofferError::ArgonMemory)
                | Err(CofferError::ArgonThreads)
                | Err(CofferError::Salt)
                | Err(CofferError::ChunkSize) => {}
                Err(other) => panic!("unexpected error kind: {other:?}"),
            }
        }
    }
}
