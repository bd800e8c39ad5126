//! Properties of the section model built from arbitrary DOL headers.
//!
//! Headers are generated slot by slot with a bias towards zero fields so that
//! live, dead and partially filled slots all show up.

use std::collections::HashSet;

use dol::{HEADER_SIZE, Image, MAX_SECTIONS, MAX_TEXT_SECTIONS, NamingSource, RawHeader};
use proptest::prelude::*;

fn arb_field() -> impl Strategy<Value = u32> {
    prop_oneof![
        1 => Just(0u32),
        3 => 1u32..=u32::MAX,
    ]
}

fn arb_header() -> impl Strategy<Value = RawHeader> {
    (
        proptest::array::uniform18(arb_field()),
        proptest::array::uniform18(arb_field()),
        proptest::array::uniform18(arb_field()),
        any::<u32>(),
        any::<u32>(),
        any::<u32>(),
    )
        .prop_map(
            |(offsets, addresses, lengths, bss_address, bss_length, entry_point)| RawHeader {
                offsets,
                addresses,
                lengths,
                bss_address,
                bss_length,
                entry_point,
            },
        )
}

fn live_slots(hdr: &RawHeader) -> Vec<usize> {
    (0..MAX_SECTIONS)
        .filter(|&i| hdr.offsets[i] != 0 && hdr.addresses[i] != 0 && hdr.lengths[i] != 0)
        .collect()
}

/// Names every slot in a fixed set, differently from the generated defaults.
struct Renamer(HashSet<usize>);

impl NamingSource for Renamer {
    fn section_name(&self, module: u32, slot: usize) -> Option<&str> {
        const NAMES: [&str; MAX_SECTIONS] = [
            "s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "s12",
            "s13", "s14", "s15", "s16", "s17",
        ];
        if module == 0 && self.0.contains(&slot) {
            Some(NAMES[slot])
        } else {
            None
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Exactly the all-non-zero slots survive, in slot order, with their values intact.
    #[test]
    fn sections_mirror_live_slots(hdr in arb_header()) {
        let data = hdr.to_bytes().unwrap();
        let image = Image::parse(&data).unwrap();
        let live = live_slots(&hdr);

        prop_assert!(image.sections().len() <= MAX_SECTIONS);
        prop_assert_eq!(image.sections().len(), live.len());
        for (sec, &slot) in image.sections().iter().zip(live.iter()) {
            prop_assert_eq!(sec.slot, slot);
            prop_assert_eq!(sec.offset, hdr.offsets[slot]);
            prop_assert_eq!(sec.address, hdr.addresses[slot]);
            prop_assert_eq!(sec.length, hdr.lengths[slot]);
        }
        prop_assert_eq!(image.header(), &hdr);
    }

    /// Text/data classification depends on the slot index alone.
    #[test]
    fn classification_is_positional(hdr in arb_header()) {
        let data = hdr.to_bytes().unwrap();
        let image = Image::parse(&data).unwrap();
        for sec in image.sections() {
            prop_assert_eq!(sec.is_code, sec.slot < MAX_TEXT_SECTIONS);
        }
    }

    /// Default names are `.text`, `.text2`, `.text3`, ... (same for `.data`) in slot order.
    #[test]
    fn default_names_are_sequential(hdr in arb_header()) {
        let data = hdr.to_bytes().unwrap();
        let image = Image::parse(&data).unwrap();

        for (is_code, base) in [(true, ".text"), (false, ".data")] {
            let names: Vec<&str> = image
                .sections()
                .iter()
                .filter(|s| s.is_code == is_code)
                .map(|s| s.name.as_str())
                .collect();
            for (rank, name) in names.iter().enumerate() {
                let expected = if rank == 0 {
                    base.to_string()
                } else {
                    format!("{}{}", base, rank + 1)
                };
                prop_assert_eq!(*name, expected.as_str());
            }
            let unique: HashSet<&str> = names.iter().copied().collect();
            prop_assert_eq!(unique.len(), names.len());
        }
    }

    /// A name from the naming source always replaces the generated one.
    #[test]
    fn naming_source_takes_precedence(
        hdr in arb_header(),
        named in proptest::collection::hash_set(0..MAX_SECTIONS, 0..MAX_SECTIONS),
    ) {
        let data = hdr.to_bytes().unwrap();
        let plain = Image::parse(&data).unwrap();
        let renamer = Renamer(named);
        let image = Image::parse_with_names(&data, &renamer).unwrap();

        prop_assert_eq!(image.sections().len(), plain.sections().len());
        for (sec, default) in image.sections().iter().zip(plain.sections()) {
            if renamer.0.contains(&sec.slot) {
                prop_assert_eq!(sec.name.clone(), format!("s{}", sec.slot));
            } else {
                prop_assert_eq!(&sec.name, &default.name);
            }
        }
    }

    /// Any buffer shorter than the header fails; anything at least that long decodes.
    #[test]
    fn truncation_boundary(len in 0usize..HEADER_SIZE * 2) {
        let data = vec![0u8; len];
        let result = Image::parse(&data);
        prop_assert_eq!(result.is_ok(), len >= HEADER_SIZE);
        if let Ok(image) = result {
            prop_assert_eq!(image.file_size(), len);
        }
    }

    /// Every header field is read big-endian.
    #[test]
    fn fields_are_big_endian(field in 0usize..HEADER_SIZE / 4, value in any::<u32>()) {
        let mut data = vec![0u8; HEADER_SIZE];
        data[field * 4..field * 4 + 4].copy_from_slice(&value.to_be_bytes());
        let hdr = RawHeader::parse(&data).unwrap();

        let mut words = Vec::with_capacity(HEADER_SIZE / 4);
        words.extend_from_slice(&hdr.offsets);
        words.extend_from_slice(&hdr.addresses);
        words.extend_from_slice(&hdr.lengths);
        words.extend_from_slice(&[hdr.bss_address, hdr.bss_length, hdr.entry_point]);
        for (i, word) in words.iter().enumerate() {
            prop_assert_eq!(*word, if i == field { value } else { 0 });
        }
    }

    /// Out-of-range sections are flagged, never rejected.
    #[test]
    fn consistency_matches_anomalies(hdr in arb_header(), extra in 0usize..0x200) {
        let mut data = hdr.to_bytes().unwrap();
        data.resize(HEADER_SIZE + extra, 0);
        let image = Image::parse(&data).unwrap();
        prop_assert_eq!(image.is_consistent(), image.anomalies().is_empty());
        for sec in image.sections() {
            prop_assert_eq!(image.section_data(sec).is_some(), sec.file_end() <= data.len() as u64);
        }
    }
}

#[test]
fn be_word_decodes_to_256() {
    let mut data = vec![0u8; HEADER_SIZE];
    data[0xe0..0xe4].copy_from_slice(&[0x00, 0x00, 0x01, 0x00]);
    assert_eq!(RawHeader::parse(&data).unwrap().entry_point, 256);
}
