/// Renders free-text descriptions before they are stored in the model.
///
/// The engine applies the renderer to every description and summary it keeps, so
/// a rendering layer can plug in its markdown-to-HTML converter here.
pub trait DescriptionRenderer {
    fn render(&self, text: &str) -> String;
}

/// Keeps descriptions exactly as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl DescriptionRenderer for PlainText {
    fn render(&self, text: &str) -> String {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_identity() {
        assert_eq!(PlainText.render("**bold** <b>"), "**bold** <b>");
    }

    struct Shouting;

    impl DescriptionRenderer for Shouting {
        fn render(&self, text: &str) -> String {
            text.to_uppercase()
        }
    }

    #[test]
    fn test_custom_renderer_as_trait_object() {
        let renderer: &dyn DescriptionRenderer = &Shouting;
        assert_eq!(renderer.render("abc"), "ABC");
    }
}
