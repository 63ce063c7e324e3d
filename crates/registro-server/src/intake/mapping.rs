use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::payload::{display_value, Submission};
use crate::domain::CoreFields;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoreField {
    Name,
    OwnerEmail,
    Cuit,
    Address,
}

impl CoreField {
    pub const ALL: [CoreField; 4] = [
        CoreField::Name,
        CoreField::OwnerEmail,
        CoreField::Cuit,
        CoreField::Address,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CoreField::Name => "name",
            CoreField::OwnerEmail => "owner_email",
            CoreField::Cuit => "cuit",
            CoreField::Address => "address",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFields(pub Vec<CoreField>);

impl From<MissingFields> for AppError {
    fn from(missing: MissingFields) -> Self {
        AppError::Validation {
            missing: missing.0.iter().map(|f| f.as_str().to_owned()).collect(),
        }
    }
}

/// How a form integration's keys map onto establishment attributes, plus
/// the labels and ignored keys used when printing the remaining fields.
///
/// The internal attribute names (`name`, `owner_email`, ...) are always
/// accepted as keys in addition to the mapped external keys.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldMapping {
    core: BTreeMap<String, CoreField>,
    #[serde(default)]
    labels: BTreeMap<String, String>,
    #[serde(default)]
    ignored: BTreeSet<String>,
}

impl FieldMapping {
    /// Reads a JSON form profile: `{"core": {...}, "labels": {...}, "ignored": [...]}`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading form profile {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing form profile {}", path.display()))
    }

    /// Resolves the four core attributes, reporting every missing one.
    pub fn resolve(&self, submission: &Submission) -> std::result::Result<CoreFields, MissingFields> {
        let values = CoreField::ALL.map(|field| self.value_for(submission, field));

        match values {
            [Some(name), Some(owner_email), Some(cuit), Some(address)] => Ok(CoreFields {
                name,
                owner_email,
                cuit,
                address,
            }),
            _ => Err(MissingFields(
                CoreField::ALL
                    .into_iter()
                    .zip(values.iter())
                    .filter(|(_, value)| value.is_none())
                    .map(|(field, _)| field)
                    .collect(),
            )),
        }
    }

    fn value_for(&self, submission: &Submission, field: CoreField) -> Option<String> {
        self.core
            .iter()
            .filter(|(_, mapped)| **mapped == field)
            .map(|(key, _)| key.as_str())
            .chain(std::iter::once(field.as_str()))
            .find_map(|key| submission.get(key).and_then(display_value))
    }

    /// Whether a submitted key belongs in the certificate's extra section.
    /// Keys with a leading underscore are form-plugin internals (nonces,
    /// submission ids) and never printed.
    pub fn is_extra(&self, key: &str) -> bool {
        !(key.starts_with('_')
            || self.core.contains_key(key)
            || CoreField::ALL.iter().any(|f| f.as_str() == key)
            || self.ignored.contains(key))
    }

    pub fn label<'a>(&'a self, key: &'a str) -> Cow<'a, str> {
        match self.labels.get(key) {
            Some(label) => Cow::Borrowed(label),
            None => Cow::Owned(title_case(&key.replace('_', " "))),
        }
    }

    /// Labelled, non-empty extra fields in submission order.
    pub fn extras<'a>(
        &'a self,
        submission: &'a Submission,
    ) -> impl Iterator<Item = (Cow<'a, str>, String)> + 'a {
        submission
            .iter()
            .filter(|(key, _)| self.is_extra(key))
            .filter_map(|(key, value)| display_value(value).map(|text| (self.label(key), text)))
    }
}

/// Uppercases the first letter of every alphabetic run and lowercases the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

const DEFAULT_CORE: &[(&str, CoreField)] = &[
    ("input_text", CoreField::Name),
    ("email", CoreField::OwnerEmail),
    ("numeric_field_4", CoreField::Cuit),
    ("input_text_24", CoreField::Address),
];

const DEFAULT_IGNORED: &[&str] = &["datetime", "created_at"];

const DEFAULT_LABELS: &[(&str, &str)] = &[
    ("input_text", "Nombre del establecimiento"),
    ("input_text_23", "Razón Social"),
    ("numeric_field_4", "Número CUIT"),
    ("phone", "WhatsApp"),
    ("input_text_24", "Ubicación del ACM"),
    ("email", "Email"),
    ("numeric_field_2", "Superficie del establecimiento en hectáreas"),
    ("input_text_2", "Departamento donde se ubica el establecimiento"),
    ("input_text_9", "Ubicación catastral (Sección - Fracción - Lote)"),
    ("input_text_10", "Coordenada Geográfica (Latitud y Longitud)"),
    ("dropdown_1", "Establecimiento inscripto como criadero de fauna silvestre"),
    ("multi_select", "Especies para caza mayor"),
    ("dropdown_3", "Presencia de ciervos en el campo"),
    ("dropdown_5", "Estimación numérica de ciervos"),
    ("input_text_11", "Valor estimado de ciervos"),
    ("input_text_13", "Margen de error en la estimación (+/- %)"),
    ("dropdown_4", "Evolución del número de ciervos (últimos 5 años)"),
    ("dropdown_6", "Porcentaje de superficie utilizada por ciervos"),
    ("checkbox", "Tipo de manejo o aprovechamiento de ciervos"),
    ("input_text_12", "Interés en mejorar prácticas de manejo"),
    ("input_text_15", "Proporción observada Machos/Hembras"),
    ("input_text_16", "Proporción en brama Machos/Hembras"),
    ("multi_select_2", "Ambientes preferenciales de ciervos"),
    ("numeric_field_3", "Estimación de ciervos extraídos por furtivos anualmente"),
    ("input_text_20", "Cantidad aproximada de jabalíes"),
    ("dropdown_8", "Evolución de la población de jabalí (últimos 3 años)"),
    ("input_text_19", "Cantidad aproximada de pumas"),
    ("dropdown_9", "Evolución de la población de pumas (últimos 3 años)"),
    ("input_text_21", "Daños cuantificados por pumas (último año)"),
    ("dropdown_10", "Presencia de poblaciones de guanacos"),
    ("dropdown_11", "Evolución de la población de guanacos (últimos 3 años)"),
    ("input_text_18", "Cantidad estimada de guanacos"),
    ("dropdown_14", "Solicitará evaluación para aprovechamiento de guanaco"),
    ("input_text_22", "Planilla completada por"),
    ("datetime", "Fecha del formulario"),
];

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            core: DEFAULT_CORE
                .iter()
                .map(|(key, field)| ((*key).to_owned(), *field))
                .collect(),
            labels: DEFAULT_LABELS
                .iter()
                .map(|(key, label)| ((*key).to_owned(), (*label).to_owned()))
                .collect(),
            ignored: DEFAULT_IGNORED.iter().map(|k| (*k).to_owned()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submission(value: serde_json::Value) -> Submission {
        Submission::from_json(value.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn resolves_external_form_keys() {
        let mapping = FieldMapping::default();
        let core = mapping
            .resolve(&submission(json!({
                "input_text": "Campo Norte",
                "email": "a@b.com",
                "numeric_field_4": 20123456789u64,
                "input_text_24": "Ruta 40 km 10",
            })))
            .unwrap();

        assert_eq!(core.name, "Campo Norte");
        assert_eq!(core.owner_email, "a@b.com");
        assert_eq!(core.cuit, "20123456789");
        assert_eq!(core.address, "Ruta 40 km 10");
    }

    #[test]
    fn accepts_internal_attribute_names() {
        let core = FieldMapping::default()
            .resolve(&submission(json!({
                "name": "Campo Norte",
                "owner_email": "a@b.com",
                "cuit": "20-12345678-9",
                "address": "Ruta 40 km 10",
            })))
            .unwrap();

        assert_eq!(core.cuit, "20-12345678-9");
    }

    #[test]
    fn reports_every_missing_field_in_order() {
        let err = FieldMapping::default()
            .resolve(&submission(json!({ "name": "Campo Norte", "cuit": "  " })))
            .unwrap_err();

        assert_eq!(
            err,
            MissingFields(vec![CoreField::OwnerEmail, CoreField::Cuit, CoreField::Address])
        );

        match AppError::from(err) {
            AppError::Validation { missing } => {
                assert_eq!(missing, ["owner_email", "cuit", "address"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn extras_skip_core_ignored_and_internal_keys() {
        let mapping = FieldMapping::default();
        let data = submission(json!({
            "input_text": "Campo Norte",
            "_fluentform_9_fluentformnonce": "abc123",
            "__submission": "1",
            "datetime": "2026-01-01",
            "phone": "+54 299 555 0000",
            "multi_select": ["Ciervo colorado", "Jabalí"],
            "cantidad_de_perros": "3",
            "dropdown_3": "",
        }));

        let extras: Vec<_> = mapping
            .extras(&data)
            .map(|(label, value)| (label.into_owned(), value))
            .collect();

        assert_eq!(
            extras,
            vec![
                ("WhatsApp".to_owned(), "+54 299 555 0000".to_owned()),
                (
                    "Especies para caza mayor".to_owned(),
                    "Ciervo colorado, Jabalí".to_owned()
                ),
                ("Cantidad De Perros".to_owned(), "3".to_owned()),
            ]
        );
    }

    #[test]
    fn title_case_matches_word_boundaries() {
        assert_eq!(title_case("numeric field 9"), "Numeric Field 9");
        assert_eq!(title_case("ÁREA protegida"), "Área Protegida");
        assert_eq!(title_case("abc1def"), "Abc1Def");
    }

    #[test]
    fn loads_profile_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        fs::write(
            &path,
            r#"{"core": {"nombre": "name", "correo": "owner_email"}, "labels": {"tel": "Teléfono"}}"#,
        )
        .unwrap();

        let mapping = FieldMapping::load(&path).unwrap();
        let core = mapping
            .resolve(&submission(json!({
                "nombre": "La Angostura",
                "correo": "x@y.com",
                "cuit": "1",
                "address": "Villa",
            })))
            .unwrap();

        assert_eq!(core.name, "La Angostura");
        assert_eq!(mapping.label("tel"), "Teléfono");
        assert!(!mapping.is_extra("nombre"));
        assert!(mapping.is_extra("email"));
    }
}
