use super::*;

#[test]
fn parse_family_list_splits_and_unquotes() {
    let list = parse_family_list("'Noto Sans SC', \"Microsoft YaHei\", SimHei, sans-serif");
    assert_eq!(
        list,
        vec![
            FamilyName::Named("Noto Sans SC".to_string()),
            FamilyName::Named("Microsoft YaHei".to_string()),
            FamilyName::Named("SimHei".to_string()),
            FamilyName::Generic(GenericFamily::SansSerif),
        ]
    );
}

#[test]
fn quoted_generic_keyword_is_a_concrete_name() {
    let list = parse_family_list("'serif', monospace");
    assert_eq!(
        list,
        vec![
            FamilyName::Named("serif".to_string()),
            FamilyName::Generic(GenericFamily::Monospace),
        ]
    );
}

#[test]
fn parse_family_list_keeps_commas_inside_quotes_and_drops_empties() {
    let list = parse_family_list(" , 'A, B' ,,cursive ");
    assert_eq!(
        list,
        vec![
            FamilyName::Named("A, B".to_string()),
            FamilyName::Generic(GenericFamily::Cursive),
        ]
    );
}

#[test]
fn parse_family_list_handles_non_ascii_names() {
    let list = parse_family_list("'方正兰亭中粗黑', serif");
    assert_eq!(list[0], FamilyName::Named("方正兰亭中粗黑".to_string()));
    assert_eq!(list[1], FamilyName::Generic(GenericFamily::Serif));
}

#[test]
fn generic_keywords_are_case_insensitive() {
    assert_eq!(
        parse_family_list("Sans-Serif"),
        vec![FamilyName::Generic(GenericFamily::SansSerif)]
    );
    assert!(parse_family_list("").is_empty());
}

#[test]
fn register_font_rejects_non_font_bytes() {
    let mut book = FontBook::new();
    assert!(book.register_font(b"not a font".to_vec()).is_err());
}

#[test]
fn layout_rejects_non_positive_size() {
    let mut book = FontBook::new();
    let font = FontSpec::new(0.0, "sans-serif");
    assert!(book.layout("x", &font, TextBrushRgba8::default()).is_err());
}

#[test]
fn unknown_family_resolves_to_fallback() {
    let mut book = FontBook::new();
    assert_eq!(
        book.resolve("'No Such Family 7f3a'"),
        FontResolution::Fallback
    );
    assert_eq!(book.resolve(""), FontResolution::Fallback);
}

#[test]
fn list_ending_in_generic_resolves() {
    let mut book = FontBook::new();
    assert_eq!(
        book.resolve("'No Such Family 7f3a', serif"),
        FontResolution::Resolved("serif".to_string())
    );
    assert_eq!(
        book.resolve("'No Such Family 7f3a', sans-serif"),
        FontResolution::Resolved("sans-serif".to_string())
    );
}

#[test]
fn measure_with_unknown_family_is_ok() {
    let mut book = FontBook::new();
    let missing = book
        .measure("abc", &FontSpec::new(20.0, "'No Such Family 7f3a'"))
        .unwrap();
    let fallback = book
        .measure("abc", &FontSpec::new(20.0, FALLBACK_FAMILY))
        .unwrap();
    assert!(missing >= 0.0);
    assert_eq!(missing, fallback);
}

#[derive(Clone, Default)]
struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn fallback_warning_is_logged_once_per_family_list() {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::WARN)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let mut book = FontBook::new();
        book.resolve("'No Such Family 7f3a'");
        book.resolve("'No Such Family 7f3a'");
        book.resolve("sans-serif");
    });

    let out = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert_eq!(out.matches("no requested font family is available").count(), 1);
    assert!(out.contains("No Such Family 7f3a"));
}

fn local_font_file() -> Option<Vec<u8>> {
    if let Ok(path) = std::env::var("WATERMARQ_TEST_FONT") {
        return std::fs::read(path).ok();
    }
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
}

#[test]
fn register_font_clears_cached_resolutions() {
    let Some(bytes) = local_font_file() else {
        eprintln!("skipping: no local font file (set WATERMARQ_TEST_FONT)");
        return;
    };
    let mut book = FontBook::new();
    book.resolve("'No Such Family 7f3a'");
    assert_eq!(book.resolutions.len(), 1);

    let names = book.register_font(bytes).unwrap();
    assert!(book.resolutions.is_empty());

    let family = format!("'{}'", names[0]);
    assert_eq!(
        book.resolve(&family),
        FontResolution::Resolved(names[0].clone())
    );
}
