use std::collections::HashSet;

/// Slug used when a title has no alphanumeric characters.
pub const FALLBACK_SLUG: &str = "flow";

/// Lower-case, collapse every non-alphanumeric run into one `-`, trim hyphens.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Hands out unique slugs in call order: the first holder of a slug keeps it,
/// later ones get `-2`, `-3`, ... (skipping any suffix already taken).
#[derive(Debug, Default)]
pub struct SlugAllocator {
    taken: HashSet<String>,
}

impl SlugAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, title: &str) -> String {
        let base = slugify(title);
        if self.taken.insert(base.clone()) {
            return base;
        }

        let mut n = 2usize;
        loop {
            let candidate = format!("{base}-{n}");
            if self.taken.insert(candidate.clone()) {
                log::warn!("Slug '{base}' already used; assigning '{candidate}'");
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_and_trims() {
        assert_eq!(slugify("Set up CI/CD -- now!"), "set-up-ci-cd-now");
        assert_eq!(slugify("  Leading and trailing  "), "leading-and-trailing");
        assert_eq!(slugify("v2.0 Release"), "v2-0-release");
    }

    #[test]
    fn slugify_falls_back_for_symbol_only_titles() {
        assert_eq!(slugify(""), FALLBACK_SLUG);
        assert_eq!(slugify("???"), FALLBACK_SLUG);
        assert_eq!(slugify("日本語"), FALLBACK_SLUG);
    }

    #[test]
    fn allocator_suffixes_collisions_in_order() {
        let mut slugs = SlugAllocator::new();
        assert_eq!(slugs.allocate("Deploy API"), "deploy-api");
        assert_eq!(slugs.allocate("deploy api"), "deploy-api-2");
        assert_eq!(slugs.allocate("Deploy API 2"), "deploy-api-2-2");
        assert_eq!(slugs.allocate("DEPLOY-API"), "deploy-api-3");
    }
}
