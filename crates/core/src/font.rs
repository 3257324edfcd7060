/// Representative font size of a fragment: the mean of its character sizes.
///
/// Fragments without sized characters (only non-text glyphs) get `0.0`, which
/// keeps them below every size floor downstream.
pub fn average_font_size(sizes: &[f32]) -> f32 {
    if sizes.is_empty() {
        return 0.0;
    }
    sizes.iter().sum::<f32>() / sizes.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_font_size_empty() {
        assert_eq!(average_font_size(&[]), 0.0);
    }

    #[test]
    fn test_average_font_size_uniform() {
        assert_eq!(average_font_size(&[12.0, 12.0, 12.0]), 12.0);
    }

    #[test]
    fn test_average_font_size_mixed() {
        // A drop cap at 24pt followed by body text at 12pt.
        assert_eq!(average_font_size(&[24.0, 12.0, 12.0, 12.0]), 15.0);
    }
}
