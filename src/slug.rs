use std::future::Future;

use crate::error::{AppError, AppResult};

const MAX_SUFFIX: u32 = 1000;

/// Turn free text into a URL slug: lowercase ASCII alphanumerics separated
/// by single hyphens.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Slug for a record: the explicit one when given, otherwise derived from
/// `name`. Both are normalized through [`slugify`].
pub fn resolve_slug(explicit: Option<&str>, name: &str) -> AppResult<String> {
    let source = explicit.filter(|s| !s.trim().is_empty()).unwrap_or(name);
    let slug = slugify(source);
    if slug.is_empty() {
        return Err(AppError::Validation(
            "slug must contain at least one letter or digit".into(),
        ));
    }
    Ok(slug)
}

/// Returns `base` if `taken` reports it free, otherwise the first free
/// `base-N` for N starting at 2.
pub async fn unique_slug<F, Fut>(base: &str, mut taken: F) -> AppResult<String>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = AppResult<bool>>,
{
    if !taken(base.to_string()).await? {
        return Ok(base.to_string());
    }
    for n in 2..=MAX_SUFFIX {
        let candidate = format!("{base}-{n}");
        if !taken(candidate.clone()).await? {
            return Ok(candidate);
        }
    }
    Err(AppError::Conflict(format!("no free slug for '{base}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Blue Monday -- Sale!"), "blue-monday-sale");
        assert_eq!(slugify("  Men's T-Shirts  "), "men-s-t-shirts");
        assert_eq!(slugify("Café 2024"), "caf-2024");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn resolve_slug_prefers_explicit_value() {
        assert_eq!(resolve_slug(Some("Custom Slug"), "Name").unwrap(), "custom-slug");
        assert_eq!(resolve_slug(Some("  "), "Winter Jackets").unwrap(), "winter-jackets");
        assert_eq!(resolve_slug(None, "Shoes").unwrap(), "shoes");
    }

    #[test]
    fn resolve_slug_rejects_symbol_only_names() {
        let err = resolve_slug(None, "!!!").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn unique_slug_appends_first_free_suffix() {
        let existing: HashSet<String> = ["hoodie", "hoodie-2"].iter().map(|s| s.to_string()).collect();
        let slug = unique_slug("hoodie", |candidate| {
            let hit = existing.contains(&candidate);
            async move { Ok(hit) }
        })
        .await
        .unwrap();
        assert_eq!(slug, "hoodie-3");
    }

    #[tokio::test]
    async fn unique_slug_keeps_free_base() {
        let slug = unique_slug("mug", |_| async { Ok(false) }).await.unwrap();
        assert_eq!(slug, "mug");
    }
}
