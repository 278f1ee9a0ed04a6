use url::Url;

/// Weak, stable 32-bit string hash (`h = h * 31 + unit` over UTF-16 units).
///
/// Only used to guess where a result page might live. Collisions are expected
/// and harmless: a wrong guess simply fails its probe.
pub fn keyword_hash(keyword: &str) -> String {
    let hash = keyword
        .trim()
        .encode_utf16()
        .fold(0i32, |acc, unit| {
            acc.wrapping_shl(5).wrapping_sub(acc).wrapping_add(i32::from(unit))
        });
    format!("{:08x}", hash as u32)
}

/// Candidate result-page locations for a keyword, most likely first.
pub fn derived_locations(base: &Url, keyword: &str) -> Vec<String> {
    if keyword.trim().is_empty() {
        return Vec::new();
    }
    let hash = keyword_hash(keyword);
    [
        format!("api/result-html/{hash}"),
        format!("results/search_{hash}.html"),
    ]
    .iter()
    .filter_map(|path| base.join(path).ok())
    .map(String::from)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_and_trims() {
        assert_eq!(keyword_hash("abc"), keyword_hash("  abc "));
        // 'a'=97: 97*31^2 + 98*31 + 99
        assert_eq!(keyword_hash("abc"), format!("{:08x}", 96354u32));
    }

    #[test]
    fn hash_handles_non_ascii() {
        assert_ne!(keyword_hash("口红"), keyword_hash("耳机"));
        assert_eq!(keyword_hash("口红").len(), 8);
    }

    #[test]
    fn derived_locations_resolve_against_base() {
        let base = Url::parse("http://localhost:8080/").unwrap();
        let locations = derived_locations(&base, "abc");
        assert_eq!(
            locations,
            vec![
                "http://localhost:8080/api/result-html/00017862".to_string(),
                "http://localhost:8080/results/search_00017862.html".to_string(),
            ]
        );
    }

    #[test]
    fn empty_keyword_has_no_locations() {
        let base = Url::parse("http://localhost:8080/").unwrap();
        assert!(derived_locations(&base, "   ").is_empty());
    }
}
