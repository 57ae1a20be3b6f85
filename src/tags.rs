/// Generates the ordered list of plausible tag names for a release.
///
/// Covers the four most common tagging conventions: bare version, `v`
/// prefix, and both with the package name in front. The list is a guess;
/// existence is determined lazily by the resolver trying each candidate in
/// order. No deduplication, duplicates only cost a wasted lookup.
pub fn candidates(package_name: &str, base_tag: &str) -> Vec<String> {
    vec![
        base_tag.to_string(),
        format!("v{}", base_tag),
        format!("{}-{}", package_name, base_tag),
        format!("{}-v{}", package_name, base_tag),
    ]
}
