//! Content addressing: digests and derived-asset keys.
//!
//! Every derived asset is keyed by a short content digest so deployed
//! filenames change exactly when content changes (cache busting).

/// Compute the short content hash of a byte sequence.
///
/// First 7 hex characters of the blake3 digest, with vowels shifted to the
/// following letter. Deterministic across runs and processes; the 7-char
/// truncation is an accepted collision risk.
pub fn content_hash<T: AsRef<[u8]> + ?Sized>(data: &T) -> String {
    let digest = blake3::hash(data.as_ref()).to_hex();
    shift_vowels(&digest.as_str()[..7])
}

/// Replace each vowel with the next letter: a→b, e→f, i→j, o→p, u→v.
///
/// Hex digests only ever contain `a` and `e`, but the full row is
/// load-bearing: deployed filenames encode this exact mapping.
fn shift_vowels(hash: &str) -> String {
    hash.chars()
        .map(|c| match c {
            'a' => 'b',
            'e' => 'f',
            'i' => 'j',
            'o' => 'p',
            'u' => 'v',
            other => other,
        })
        .collect()
}

/// Format a deterministic, path-safe asset key.
///
/// Layout: `service/build/kind/discriminator[.infix][.ext]`. Empty `infix`
/// and `ext` are skipped. Identical arguments always yield the identical
/// key, so the same call both creates and looks up an entry.
///
/// ```text
/// build_key("svc", "7", "v1", "js", "js", "map")      -> svc/7/js/v1.js.map
/// build_key("svc", "7", "v1", "b6f89fc", "js", "js")  -> svc/7/js/v1.b6f89fc.js
/// build_key("svc", "7", "repo/app.js", "", "src", "") -> svc/7/src/repo/app.js
/// ```
pub fn build_key(
    service_name: &str,
    build_number: &str,
    discriminator: &str,
    infix: &str,
    kind: &str,
    extension: &str,
) -> String {
    let mut name = discriminator.to_string();
    if !infix.is_empty() {
        name.push('.');
        name.push_str(infix);
    }
    if !extension.is_empty() {
        name.push('.');
        name.push_str(extension);
    }
    format!("{service_name}/{build_number}/{kind}/{name}")
}
