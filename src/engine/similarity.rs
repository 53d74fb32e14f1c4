//! Name and size similarity signals used by the matchers.

use crate::types::Geometry;

/// Lower-cased whitespace tokens of a design node name.
pub fn design_tokens(name: &str) -> Vec<String> {
    name.split_whitespace().map(str::to_lowercase).collect()
}

/// Lower-cased tokens of an element label, split on `#`, `.` and whitespace.
pub fn element_tokens(name: &str) -> Vec<String> {
    name.split(|c: char| c == '#' || c == '.' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Token overlap between a design name and an element label, in `[0, 1]`.
///
/// A design token matches when some element token contains it or is
/// contained in it. The score is `matched / max(len_a, len_b)`; zero tokens
/// on either side score 0.
pub fn name_similarity(design_name: &str, element_name: &str) -> f64 {
    let a = design_tokens(design_name);
    let b = element_tokens(element_name);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let matched = a
        .iter()
        .filter(|ta| b.iter().any(|tb| ta.contains(tb.as_str()) || tb.contains(ta.as_str())))
        .count();

    matched as f64 / a.len().max(b.len()) as f64
}

/// Width/height closeness in `[0, 1]`: per axis `1 - |a-b| / max(a,b)`, averaged.
///
/// An axis where both sides are 0 has no defined ratio; the pair then counts
/// as non-matching and scores 0.
pub fn size_similarity(design: &Geometry, element: &Geometry) -> f64 {
    match (
        axis_similarity(design.width, element.width),
        axis_similarity(design.height, element.height),
    ) {
        (Some(w), Some(h)) => {
            let score = (w + h) / 2.0;
            if score.is_finite() {
                score.clamp(0.0, 1.0)
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

fn axis_similarity(a: f64, b: f64) -> Option<f64> {
    let max = a.max(b);
    if max <= 0.0 {
        return None;
    }
    Some(1.0 - (a - b).abs() / max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_element_labels_on_id_and_class_separators() {
        assert_eq!(
            element_tokens("button#Buy.submit-btn  primary"),
            vec!["button", "buy", "submit-btn", "primary"]
        );
        assert_eq!(element_tokens("#.  ."), Vec::<String>::new());
    }

    #[test]
    fn identical_names_score_one() {
        assert_eq!(name_similarity("hero", "hero"), 1.0);
        assert_eq!(name_similarity("Nav Bar", "nav bar"), 1.0);
    }

    #[test]
    fn substring_tokens_count_as_matches() {
        // {submit, button} vs {button, submit-btn}: both design tokens match.
        let score = name_similarity("Submit Button", "button.submit-btn");
        assert!(score >= 0.5, "expected >= 0.5, got {score}");
        assert_eq!(score, 1.0);
    }

    #[test]
    fn divides_by_larger_token_count() {
        // one design token matched against four element tokens
        let score = name_similarity("Logo", "img#logo.brand.large");
        assert!((score - 0.25).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn empty_names_score_zero() {
        assert_eq!(name_similarity("", "div.card"), 0.0);
        assert_eq!(name_similarity("Card", "   "), 0.0);
        assert_eq!(name_similarity("Card", "section.hero"), 0.0);
    }

    #[test]
    fn identical_geometry_scores_one() {
        let g = Geometry::new(5.0, 5.0, 120.0, 40.0);
        assert_eq!(size_similarity(&g, &g), 1.0);
    }

    #[test]
    fn size_similarity_averages_axes() {
        let design = Geometry::sized(100.0, 50.0);
        let element = Geometry::sized(80.0, 50.0);
        // width 1 - 20/100 = 0.8, height 1.0
        assert!((size_similarity(&design, &element) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn zero_by_zero_axis_is_non_matching() {
        let design = Geometry::sized(0.0, 40.0);
        let element = Geometry::sized(0.0, 40.0);
        assert_eq!(size_similarity(&design, &element), 0.0);
    }

    #[test]
    fn size_similarity_stays_in_bounds() {
        let samples = [
            (Geometry::sized(1.0, 1.0), Geometry::sized(1000.0, 1000.0)),
            (Geometry::sized(0.0, 10.0), Geometry::sized(10.0, 10.0)),
            (Geometry::sized(-5.0, 10.0), Geometry::sized(10.0, 10.0)),
            (Geometry::sized(f64::NAN, 10.0), Geometry::sized(10.0, 10.0)),
        ];
        for (a, b) in samples {
            let score = size_similarity(&a, &b);
            assert!((0.0..=1.0).contains(&score), "{a:?} vs {b:?} -> {score}");
        }
    }

    #[test]
    fn name_similarity_stays_in_bounds() {
        let samples = [
            ("a a a a", "a"),
            ("a", "a.a.a.a"),
            ("Primary CTA Button", "a#cta.button.primary.large"),
        ];
        for (a, b) in samples {
            let score = name_similarity(a, b);
            assert!((0.0..=1.0).contains(&score), "{a} vs {b} -> {score}");
        }
    }
}
