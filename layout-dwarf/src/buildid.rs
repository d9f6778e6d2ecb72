//! Reads the GNU build-id note out of an already-parsed object file.
//!
//! Fully decoupled from the (explicitly out-of-scope) debug-link lookup
//! this would normally feed into downstream — this module only computes
//! the id of the binary that was actually read, for provenance.

use object::{Object, ObjectSection};

/// Reads `.note.gnu.build-id` and returns its payload as a lowercase hex
/// string, matching how build-ids are conventionally displayed
/// (`readelf -n`, `file`). `None` if the section is absent — older
/// toolchains may omit it, and that is not an error.
pub fn read_build_id<'data>(object_file: &impl Object<'data>) -> Option<String> {
    let section = object_file.section_by_name(".note.gnu.build-id")?;
    let data = section.uncompressed_data().ok()?;
    parse_note_payload(&data).map(hex_encode)
}

/// ELF notes are `(namesz, descsz, type, name, desc)` records, each
/// field padded to 4-byte alignment. The build-id note has exactly one
/// record; its `desc` is the id itself.
fn parse_note_payload(data: &[u8]) -> Option<Vec<u8>> {
    if data.len() < 12 {
        return None;
    }
    let namesz = u32::from_ne_bytes(data[0..4].try_into().ok()?) as usize;
    let descsz = u32::from_ne_bytes(data[4..8].try_into().ok()?) as usize;
    let name_start = 12;
    let name_end = name_start + namesz;
    let desc_start = align4(name_end);
    let desc_end = desc_start + descsz;
    data.get(desc_start..desc_end).map(|d| d.to_vec())
}

fn align4(n: usize) -> usize {
    (n + 3) & !3
}

fn hex_encode(bytes: Vec<u8>) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_well_formed_note() {
        let mut note = Vec::new();
        note.extend_from_slice(&4u32.to_ne_bytes()); // namesz
        note.extend_from_slice(&4u32.to_ne_bytes()); // descsz
        note.extend_from_slice(&3u32.to_ne_bytes()); // type = NT_GNU_BUILD_ID
        note.extend_from_slice(b"GNU\0"); // name, already 4-byte aligned
        note.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]); // desc
        let parsed = parse_note_payload(&note).unwrap();
        assert_eq!(hex_encode(parsed), "deadbeef");
    }

    #[test]
    fn short_buffer_is_none() {
        assert_eq!(parse_note_payload(&[1, 2, 3]), None);
    }
}
