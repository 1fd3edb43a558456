use super::cursor::{required, Cursor};
use super::RecordGrammar;
use crate::error::GrammarError;
use crate::types::{fields, Paragraph, RawRecord, RecordKind};

const OPERATIONS_ANCHOR: &str = "Comienzo de operaciones:";
const CODE_SEPARATOR: &str = "-";
const LINE_BREAK: &str = "\n";
const SENTENCE_END: &str = ". ";
const ADDRESS_ANCHOR: &str = "Domicilio:";
const FIELD_SEPARATOR: &str = ":";
const CAPITAL_ANCHOR: &str = "Capital";
const CLAUSE_SEPARATOR: &str = ",";

/// Grammar for company incorporation ("Constitución") records.
///
/// The paragraph is read as a fixed sequence of anchored steps:
///
/// ```text
/// title ──"Comienzo de operaciones:"──▶ date ──". "──▶ free field
///       ──"Domicilio:"──▶ address ──"Capital"──▶ capital (optional)
/// ```
///
/// Steps up to the address are mandatory; the capital clause is not.
#[derive(Debug, Default, Clone, Copy)]
pub struct IncorporationGrammar;

impl IncorporationGrammar {
    pub fn new() -> Self {
        Self
    }

    /// Run every step over raw paragraph text
    pub fn parse_text(&self, text: &str) -> Result<RawRecord, GrammarError> {
        let mut record = RawRecord::new(RecordKind::Incorporation);
        let mut cursor = Cursor::new(text);

        let title = cursor.take_until("title", OPERATIONS_ANCHOR)?;
        Self::title_block(title, &mut record)?;
        Self::operations_date(&mut cursor, &mut record)?;

        // The rest of the record is free text wrapped over several lines
        let flattened = cursor.rest().replace('\n', "");
        let mut cursor = Cursor::new(flattened.trim());
        Self::free_field(&mut cursor, &mut record)?;
        Self::address(&mut cursor, &mut record)?;
        Self::capital(cursor.rest(), &mut record);

        Ok(record)
    }

    /// `<code>-<name>\n<legal act>`
    pub(crate) fn title_block(title: &str, record: &mut RawRecord) -> Result<(), GrammarError> {
        let mut title = Cursor::new(title);
        let code = title.take_until("title code", CODE_SEPARATOR)?;
        let name = title.take_until("title name", LINE_BREAK)?;

        record.set(fields::ID, required(code, "title code", fields::ID)?);
        record.set(fields::NAME, required(name, "title name", fields::NAME)?);
        record.set(fields::LEGAL_ACT, title.rest().trim());
        Ok(())
    }

    fn operations_date(cursor: &mut Cursor<'_>, record: &mut RawRecord) -> Result<(), GrammarError> {
        let date = cursor.take_until("operations date", SENTENCE_END)?;
        record.set(fields::OPERATIONS_START, date.trim());
        Ok(())
    }

    /// Whatever `key: value` precedes the address, usually "Objeto social"
    fn free_field(cursor: &mut Cursor<'_>, record: &mut RawRecord) -> Result<(), GrammarError> {
        let block = cursor.take_until("free field", ADDRESS_ANCHOR)?;
        let mut block = Cursor::new(block);
        let key = block.take_until("free field key", FIELD_SEPARATOR)?;
        record.set(key.trim(), block.rest().trim());
        Ok(())
    }

    fn address(cursor: &mut Cursor<'_>, record: &mut RawRecord) -> Result<(), GrammarError> {
        let address = cursor.take_until("address", CAPITAL_ANCHOR)?;
        record.set(fields::ADDRESS, address.trim());
        Ok(())
    }

    fn capital(tail: &str, record: &mut RawRecord) {
        let clause = tail.split(CLAUSE_SEPARATOR).next().unwrap_or_default();
        let clause = clause.trim();
        let clause = clause.strip_prefix(':').unwrap_or(clause).trim();
        if !clause.is_empty() {
            record.set(fields::CAPITAL, clause);
        }
    }
}

impl RecordGrammar for IncorporationGrammar {
    fn kind(&self) -> RecordKind {
        RecordKind::Incorporation
    }

    fn parse(&self, paragraph: &Paragraph) -> Result<RawRecord, GrammarError> {
        self.parse_text(&paragraph.text)
    }

    fn name(&self) -> &str {
        "Incorporation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACME: &str = "123456-ACME SL.\nConstitución de sociedad. Comienzo de operaciones: 01.01.20. Objeto social: construcción de edificios. Domicilio: C/ Mayor 45 (Madrid). Capital: 3.000, Nombramientos: ...";

    fn fields_of(record: &RawRecord) -> Vec<(String, String)> {
        record
            .fields()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parses_a_complete_record() {
        let record = IncorporationGrammar::new().parse_text(ACME).unwrap();

        let expected: Vec<(String, String)> = [
            ("Id", "123456"),
            ("nombre", "ACME SL."),
            ("Acto legal", "Constitución de sociedad."),
            ("Comienzo de operaciones", "01.01.20"),
            ("Objeto social", "construcción de edificios."),
            ("Domicilio", "C/ Mayor 45 (Madrid)."),
            ("Capital", "3.000"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        assert_eq!(record.kind, RecordKind::Incorporation);
        assert_eq!(fields_of(&record), expected);
    }

    #[test]
    fn body_lines_are_joined_before_the_free_field() {
        let text = "100001-LINEA SL.\nConstitución de sociedad. Comienzo de operaciones: 02.03.21. Objeto social: venta de\nproductos. Domicilio: AVDA DE LA\nPAZ 3 (SEVILLA). Capital: 60.000,00 Euros.";
        let record = IncorporationGrammar::new().parse_text(text).unwrap();

        assert_eq!(record.get("Objeto social"), Some("venta deproductos."));
        assert_eq!(record.get(fields::ADDRESS), Some("AVDA DE LAPAZ 3 (SEVILLA)."));
        assert_eq!(record.get(fields::CAPITAL), Some("60.000"));
    }

    #[test]
    fn free_field_key_is_generic() {
        let text = "100002-OTRA SL.\nConstitución. Comienzo de operaciones: 05.06.22. Actividad: hostelería. Domicilio: PLAZA MAYOR 1 (AVILA). Capital: 3.100, Socio único.";
        let record = IncorporationGrammar::new().parse_text(text).unwrap();

        assert_eq!(record.get("Actividad"), Some("hostelería."));
        assert!(!record.contains("Objeto social"));
    }

    #[test]
    fn empty_capital_clause_is_omitted() {
        let text = "100003-SIN CAPITAL SL.\nConstitución. Comienzo de operaciones: 05.06.22. Objeto social: x. Domicilio: C/ Sol 2 (Lugo). Capital";
        let record = IncorporationGrammar::new().parse_text(text).unwrap();

        assert_eq!(record.get(fields::ADDRESS), Some("C/ Sol 2 (Lugo)."));
        assert!(!record.contains(fields::CAPITAL));
    }

    #[test]
    fn each_mandatory_anchor_is_required() {
        let grammar = IncorporationGrammar::new();
        let cases = [
            ("123456-ACME SL.\nConstitución. Objeto social: x. Domicilio: y. Capital: 1", "title"),
            ("123456 ACME SL.\nConstitución. Comienzo de operaciones: 01.01.20. Objeto social: x. Domicilio: y. Capital: 1", "title code"),
            ("123456-ACME SL. Constitución. Comienzo de operaciones: 01.01.20. Objeto social: x. Domicilio: y. Capital: 1", "title name"),
            ("123456-ACME SL.\nConstitución. Comienzo de operaciones: 01.01.20", "operations date"),
            ("123456-ACME SL.\nConstitución. Comienzo de operaciones: 01.01.20. Objeto social: x. Capital: 1", "free field"),
            ("123456-ACME SL.\nConstitución. Comienzo de operaciones: 01.01.20. Objeto social x. Domicilio: y. Capital: 1", "free field key"),
            ("123456-ACME SL.\nConstitución. Comienzo de operaciones: 01.01.20. Objeto social: x. Domicilio: y.", "address"),
        ];

        for (text, expected_step) in cases {
            match grammar.parse_text(text) {
                Err(GrammarError::MissingAnchor { step, .. }) => {
                    assert_eq!(step, expected_step, "wrong step for {text:?}")
                }
                other => panic!("expected failure at {expected_step} for {text:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn blank_name_fails() {
        let text = "123456- \nConstitución. Comienzo de operaciones: 01.01.20. Objeto social: x. Domicilio: y. Capital: 1";
        assert!(matches!(
            IncorporationGrammar::new().parse_text(text),
            Err(GrammarError::EmptyField { field: "nombre", .. })
        ));
    }
}
