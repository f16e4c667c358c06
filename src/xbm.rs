use serde::{Deserialize, Serialize};

/// Dimensions and symbol name read from the `#define` lines of a chunk.
///
/// This is reporting metadata only; nothing checks that the data array
/// actually matches the declared size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XbmInfo {
    /// Symbol prefix, e.g. `xbm` for `#define xbm_width 10`
    pub name: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl XbmInfo {
    /// Sniff `_width` / `_height` defines from chunk text
    pub fn from_text(text: &str) -> Self {
        let mut info = Self::default();

        for line in text.split(|c| c == '\r' || c == '\n') {
            let Some((name, field, value)) = parse_define(line) else {
                continue;
            };
            match field {
                "width" if info.width.is_none() => {
                    info.width = value;
                    info.name.get_or_insert_with(|| name.to_string());
                }
                "height" if info.height.is_none() => info.height = value,
                _ => {}
            }
        }

        info
    }
}

/// Split `... #define <name>_<field> <value>` into its parts
fn parse_define(line: &str) -> Option<(&str, &str, Option<u32>)> {
    let (_, rest) = line.split_once("#define")?;
    let mut parts = rest.split_whitespace();
    let symbol = parts.next()?;
    let value = parts.next().and_then(|v| v.parse().ok());
    let (name, field) = symbol.rsplit_once('_')?;
    Some((name, field, value))
}
