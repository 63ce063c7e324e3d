use chrono::{DateTime, Local};

use super::{Branding, CertificateRequest};
use crate::intake::FieldMapping;

/// US Letter, in points.
pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;

const LEFT_MARGIN: f32 = 50.0;
const BOTTOM_MARGIN: f32 = 50.0;

/// Extra values longer than this many characters are word-wrapped.
pub const WRAP_WIDTH: usize = 80;

const CORE_LABELS: [&str; 4] = [
    "Nombre del Establecimiento",
    "Email del Propietario",
    "CUIT",
    "Dirección/Ubicación",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub weight: FontWeight,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<TextLine>,
}

/// Box the logo is scaled into, bottom-left corner at (`x`, `y`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogoPlacement {
    pub x: f32,
    pub y: f32,
    pub max_width: f32,
    pub max_height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub logo: Option<LogoPlacement>,
    pub pages: Vec<Page>,
}

impl Layout {
    pub fn lines(&self) -> impl Iterator<Item = &TextLine> {
        self.pages.iter().flat_map(|p| p.lines.iter())
    }

    pub fn contains_line(&self, text: &str) -> bool {
        self.lines().any(|l| l.text == text)
    }
}

struct Cursor {
    pages: Vec<Page>,
    y: f32,
}

impl Cursor {
    fn new(y: f32) -> Self {
        Self {
            pages: vec![Page::default()],
            y,
        }
    }

    fn line(&mut self, weight: FontWeight, size: f32, text: String, advance: f32) {
        if self.y < BOTTOM_MARGIN {
            self.pages.push(Page::default());
            self.y = PAGE_HEIGHT - BOTTOM_MARGIN;
        }

        let y = self.y;
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(TextLine {
                x: LEFT_MARGIN,
                y,
                size,
                weight,
                text,
            });
        }
        self.y -= advance;
    }

    fn skip(&mut self, amount: f32) {
        self.y -= amount;
    }
}

pub fn compose(
    request: &CertificateRequest,
    mapping: &FieldMapping,
    branding: &Branding,
    with_logo: bool,
    generated_at: DateTime<Local>,
) -> Layout {
    let mut cursor = Cursor::new(PAGE_HEIGHT - 120.0);

    cursor.line(FontWeight::Bold, 16.0, branding.title.clone(), 30.0);
    cursor.line(
        FontWeight::Bold,
        12.0,
        format!("ID de Registro: {}", request.id),
        20.0,
    );
    cursor.line(
        FontWeight::Bold,
        12.0,
        format!(
            "Fecha de Registro: {}",
            request
                .created_at
                .with_timezone(&Local)
                .format("%d/%m/%Y %H:%M:%S")
        ),
        30.0,
    );

    cursor.line(FontWeight::Bold, 10.0, "DATOS PRINCIPALES".into(), 20.0);
    let core = &request.core;
    let values = [&core.name, &core.owner_email, &core.cuit, &core.address];
    for (label, value) in CORE_LABELS.iter().zip(values) {
        if !value.trim().is_empty() {
            cursor.line(FontWeight::Regular, 10.0, format!("{label}: {value}"), 18.0);
        }
    }
    cursor.skip(10.0);

    if let Some(submission) = &request.submission {
        let mut extras = mapping.extras(submission).peekable();
        if extras.peek().is_some() {
            cursor.line(
                FontWeight::Bold,
                10.0,
                "INFORMACIÓN ADICIONAL DEL FORMULARIO".into(),
                20.0,
            );
        }

        for (label, value) in extras {
            if value.chars().count() > WRAP_WIDTH {
                let mut chunks = wrap(&value, WRAP_WIDTH).into_iter();
                if let Some(first) = chunks.next() {
                    cursor.line(FontWeight::Regular, 9.0, format!("{label}: {first}"), 15.0);
                }
                for chunk in chunks {
                    cursor.line(FontWeight::Regular, 9.0, format!("  {chunk}"), 15.0);
                }
            } else {
                cursor.line(FontWeight::Regular, 9.0, format!("{label}: {value}"), 15.0);
            }
        }
    }

    let footer_date = format!(
        "Documento generado automáticamente - {}",
        generated_at.format("%d/%m/%Y")
    );
    let mut pages = cursor.pages;
    for page in &mut pages {
        page.lines.push(footer_line(30.0, branding.organization.clone()));
        page.lines.push(footer_line(20.0, footer_date.clone()));
    }

    Layout {
        logo: with_logo.then_some(LogoPlacement {
            x: LEFT_MARGIN,
            y: PAGE_HEIGHT - 80.0,
            max_width: 300.0,
            max_height: 50.0,
        }),
        pages,
    }
}

fn footer_line(y: f32, text: String) -> TextLine {
    TextLine {
        x: LEFT_MARGIN,
        y,
        size: 8.0,
        weight: FontWeight::Regular,
        text,
    }
}

/// Greedy word wrap; a single word longer than `width` gets a line of its own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CoreFields;
    use crate::intake::Submission;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::path::PathBuf;

    fn branding() -> Branding {
        Branding {
            title: "Inscripción de establecimiento para actividad de caza 2026".into(),
            organization: "Dirección Provincial de Fauna de Neuquén".into(),
            logo_path: PathBuf::from("static/logo.png"),
        }
    }

    fn request(submission: Option<serde_json::Value>) -> CertificateRequest {
        CertificateRequest {
            id: 42,
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            core: CoreFields {
                name: "Campo Norte".into(),
                owner_email: "a@b.com".into(),
                cuit: "20-12345678-9".into(),
                address: "Ruta 40 km 10".into(),
            },
            submission: submission
                .map(|v| Submission::from_json(v.to_string().as_bytes()).unwrap()),
        }
    }

    fn generated_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap()
    }

    fn compose_default(request: &CertificateRequest) -> Layout {
        compose(request, &FieldMapping::default(), &branding(), false, generated_at())
    }

    #[test]
    fn prints_header_and_core_fields() {
        let layout = compose_default(&request(None));

        assert_eq!(layout.pages.len(), 1);
        assert!(layout.contains_line("ID de Registro: 42"));
        assert!(layout.contains_line("Nombre del Establecimiento: Campo Norte"));
        assert!(layout.contains_line("Email del Propietario: a@b.com"));
        assert!(layout.contains_line("CUIT: 20-12345678-9"));
        assert!(layout.contains_line("Dirección/Ubicación: Ruta 40 km 10"));
        assert!(!layout.contains_line("INFORMACIÓN ADICIONAL DEL FORMULARIO"));
        assert!(layout.logo.is_none());
    }

    #[test]
    fn skips_empty_core_fields() {
        let mut req = request(None);
        req.core.address = String::new();

        let layout = compose_default(&req);
        assert!(!layout.lines().any(|l| l.text.starts_with("Dirección/Ubicación")));
    }

    #[test]
    fn prints_labelled_extras_in_submission_order() {
        let layout = compose_default(&request(Some(json!({
            "input_text": "Campo Norte",
            "phone": "299 555",
            "_fluentform_9_fluentformnonce": "x",
            "multi_select": ["Ciervo", "Jabalí"],
            "otro_dato": "valor",
        }))));

        let texts: Vec<_> = layout.lines().map(|l| l.text.as_str()).collect();
        let heading = texts
            .iter()
            .position(|t| *t == "INFORMACIÓN ADICIONAL DEL FORMULARIO")
            .unwrap();
        assert_eq!(
            &texts[heading + 1..heading + 4],
            [
                "WhatsApp: 299 555",
                "Especies para caza mayor: Ciervo, Jabalí",
                "Otro Dato: valor",
            ]
        );
        assert!(!texts.iter().any(|t| t.contains("fluentformnonce")));
    }

    #[test]
    fn wraps_long_values_without_repeating_label() {
        let long = "palabra ".repeat(30);
        let layout = compose_default(&request(Some(json!({ "observaciones": long }))));

        let texts: Vec<_> = layout.lines().map(|l| l.text.clone()).collect();
        let first = texts
            .iter()
            .position(|t| t.starts_with("Observaciones: "))
            .unwrap();

        assert!(texts[first + 1].starts_with("  palabra"));
        assert!(texts[first + 2].starts_with("  palabra"));
        assert!(!texts[first + 1].contains("Observaciones"));

        let rejoined: Vec<&str> = texts[first..first + 3]
            .iter()
            .map(|t| t.trim_start_matches("Observaciones: ").trim())
            .collect();
        assert_eq!(rejoined.join(" "), long.trim());
    }

    #[test]
    fn wrap_respects_width() {
        let lines = wrap("uno dos tres cuatro cinco", 9);
        assert_eq!(lines, ["uno dos", "tres", "cuatro", "cinco"]);
        assert_eq!(wrap("supercalifragilistico", 5), ["supercalifragilistico"]);
    }

    #[test]
    fn paginates_and_repeats_footer() {
        let mut extras = serde_json::Map::new();
        for i in 0..80 {
            extras.insert(format!("campo_{i}"), json!(format!("valor {i}")));
        }
        let layout = compose_default(&request(Some(serde_json::Value::Object(extras))));

        assert!(layout.pages.len() >= 2);
        for page in &layout.pages {
            assert!(page
                .lines
                .iter()
                .any(|l| l.text == "Dirección Provincial de Fauna de Neuquén"));
            assert!(page
                .lines
                .iter()
                .any(|l| l.text == "Documento generado automáticamente - 02/03/2026"));
            for line in page.lines.iter().filter(|l| l.size > 8.0) {
                assert!(line.y >= BOTTOM_MARGIN - 15.0, "line below margin: {line:?}");
            }
        }

        let second = &layout.pages[1];
        assert_eq!(second.lines[0].y, PAGE_HEIGHT - BOTTOM_MARGIN);
        assert_eq!(second.lines[0].size, 9.0);
        assert_eq!(second.lines[0].weight, FontWeight::Regular);
        assert!(layout.contains_line("Campo 79: valor 79"));
    }

    #[test]
    fn layout_is_deterministic() {
        let req = request(Some(json!({ "phone": "299", "dropdown_3": "Sí" })));
        assert_eq!(compose_default(&req), compose_default(&req));
    }

    #[test]
    fn logo_box_only_when_present() {
        let layout = compose(
            &request(None),
            &FieldMapping::default(),
            &branding(),
            true,
            generated_at(),
        );
        let logo = layout.logo.unwrap();
        assert_eq!((logo.max_width, logo.max_height), (300.0, 50.0));
    }
}
