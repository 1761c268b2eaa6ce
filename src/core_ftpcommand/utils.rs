/// Transfer type and format codes of the TYPE command.
const TRANSFER_TYPES: &[(char, &str)] = &[
    ('A', "ASCII"),
    ('E', "EBCDIC"),
    ('I', "BINARY"),
    ('L', "LOCAL FORMAT"),
    ('N', "NON PRINT"),
    ('T', "TELNET"),
    ('C', "ASA CARRIAGE CONTROL"),
];

fn transfer_type_name(code: char) -> Option<&'static str> {
    TRANSFER_TYPES
        .iter()
        .find(|(candidate, _)| *candidate == code)
        .map(|(_, name)| *name)
}

/// Upper-cases a TYPE argument and drops its spaces, so `a n` becomes `AN`.
pub fn normalize_transfer_type(arg: &str) -> String {
    arg.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Describes a one or two letter transfer type code, e.g. `AN` as
/// `ASCII NON PRINT`. The format defaults to non print.
pub fn encode_transfer_type(code: &str) -> Option<String> {
    let mut chars = code.chars();
    let base = transfer_type_name(chars.next()?)?;
    let format = match chars.next() {
        Some(format) => transfer_type_name(format)?,
        None => "NON PRINT",
    };
    if chars.next().is_some() {
        return None;
    }
    Some(format!("{} {}", base, format))
}
