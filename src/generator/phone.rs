use std::collections::HashSet;

use lazy_static::lazy_static;
use rand::{Rng, RngCore};
use serde::Serialize;
use thiserror::Error;

// Published number segments per carrier. The four lists are disjoint.

// 中国移动
const MOBILE_PREFIXES: &[&str] = &[
    "134", "135", "136", "137", "138", "139", "150", "151", "152", "157",
    "158", "159", "182", "183", "184", "187", "188", "195", "197", "198",
    "147",
];

// 中国联通
const UNICOM_PREFIXES: &[&str] = &[
    "130", "131", "132", "145", "155", "156", "166", "175", "176", "185",
    "186",
];

// 中国电信
const TELECOM_PREFIXES: &[&str] = &[
    "133", "149", "153", "173", "174", "177", "180", "181", "189", "190",
    "191", "193", "199",
];

// 虚拟运营商
const VIRTUAL_PREFIXES: &[&str] = &["170", "171", "162"];

// 数据卡 segment. Part of the full list but of no carrier list, so
// classification reports these numbers as 未知运营商.
const DATA_CARD_PREFIXES: &[&str] = &["1440"];

const PHONE_LENGTH: usize = 11;

lazy_static! {
    // Union of all supported segments, in published order.
    static ref ALL_PREFIXES: Vec<&'static str> = MOBILE_PREFIXES
        .iter()
        .chain(DATA_CARD_PREFIXES)
        .chain(UNICOM_PREFIXES)
        .chain(TELECOM_PREFIXES)
        .chain(VIRTUAL_PREFIXES)
        .copied()
        .collect();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Carrier {
    Mobile,
    Unicom,
    Telecom,
    Virtual,
}

impl Carrier {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mobile" => Some(Carrier::Mobile),
            "unicom" => Some(Carrier::Unicom),
            "telecom" => Some(Carrier::Telecom),
            "virtual" => Some(Carrier::Virtual),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Carrier::Mobile => "中国移动",
            Carrier::Unicom => "中国联通",
            Carrier::Telecom => "中国电信",
            Carrier::Virtual => "虚拟运营商",
        }
    }

    fn prefixes(&self) -> &'static [&'static str] {
        match self {
            Carrier::Mobile => MOBILE_PREFIXES,
            Carrier::Unicom => UNICOM_PREFIXES,
            Carrier::Telecom => TELECOM_PREFIXES,
            Carrier::Virtual => VIRTUAL_PREFIXES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneError {
    #[error("unsupported phone prefix: {0}")]
    UnsupportedPrefix(String),
}

/// Generates one 11-digit number. An explicit `prefix` must appear in the
/// full segment list; otherwise the prefix is drawn from the given
/// carrier's list, or uniformly from the full list.
pub fn generate_phone_number<T: RngCore>(
    rng: &mut T,
    prefix: Option<&str>,
    carrier: Option<Carrier>,
) -> Result<String, PhoneError> {
    let chosen = match prefix {
        Some(p) => {
            if !ALL_PREFIXES.iter().any(|&known| known == p) {
                return Err(PhoneError::UnsupportedPrefix(p.to_string()));
            }
            p
        }
        None => match carrier {
            Some(c) => {
                let table = c.prefixes();
                table[rng.random_range(0..table.len())]
            }
            None => ALL_PREFIXES[rng.random_range(0..ALL_PREFIXES.len())],
        },
    };

    let mut number = String::with_capacity(PHONE_LENGTH);
    number.push_str(chosen);
    for _ in chosen.len()..PHONE_LENGTH {
        number.push(char::from(b'0' + rng.random_range(0..10u8)));
    }
    Ok(number)
}

/// Generates a batch of numbers. With `unique`, in-batch duplicates are
/// discarded and total draws are capped at `count * 10`; hitting the cap
/// returns a short list without an error.
pub fn generate_phone_numbers<T: RngCore>(
    rng: &mut T,
    count: usize,
    prefix: Option<&str>,
    carrier: Option<Carrier>,
    unique: bool,
) -> Result<Vec<String>, PhoneError> {
    if count == 0 {
        return Ok(Vec::new());
    }

    let mut numbers = Vec::with_capacity(count);
    let mut seen = HashSet::new();

    let max_attempts = count * 10;
    let mut attempts = 0;

    while numbers.len() < count && attempts < max_attempts {
        let phone = generate_phone_number(rng, prefix, carrier)?;
        if unique {
            if seen.insert(phone.clone()) {
                numbers.push(phone);
            }
        } else {
            numbers.push(phone);
        }
        attempts += 1;
    }

    Ok(numbers)
}

/// Classifies a number by its first 3 characters, checking the carrier
/// lists in the order mobile, unicom, telecom, virtual. The 4-character
/// 数据卡 segment "1440" is therefore never matched ("144" is in no list)
/// and reports as 未知运营商.
pub fn get_carrier_name(phone_number: &str) -> &'static str {
    if phone_number.chars().count() < 3 {
        return "未知";
    }

    let prefix: String = phone_number.chars().take(3).collect();
    let matches = |table: &[&str]| table.iter().any(|&p| p == prefix);

    if matches(MOBILE_PREFIXES) {
        Carrier::Mobile.display_name()
    } else if matches(UNICOM_PREFIXES) {
        Carrier::Unicom.display_name()
    } else if matches(TELECOM_PREFIXES) {
        Carrier::Telecom.display_name()
    } else if matches(VIRTUAL_PREFIXES) {
        Carrier::Virtual.display_name()
    } else {
        "未知运营商"
    }
}

/// Segment counts and the full supported list, for display only.
#[derive(Debug, Clone, Serialize)]
pub struct PhoneStatistics {
    pub total_prefixes: usize,
    pub mobile_prefixes: usize,
    pub unicom_prefixes: usize,
    pub telecom_prefixes: usize,
    pub virtual_prefixes: usize,
    pub supported_prefixes: Vec<&'static str>,
}

pub fn statistics() -> PhoneStatistics {
    PhoneStatistics {
        total_prefixes: ALL_PREFIXES.len(),
        mobile_prefixes: MOBILE_PREFIXES.len(),
        unicom_prefixes: UNICOM_PREFIXES.len(),
        telecom_prefixes: TELECOM_PREFIXES.len(),
        virtual_prefixes: VIRTUAL_PREFIXES.len(),
        supported_prefixes: ALL_PREFIXES.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn test_rng() -> SmallRng {
        SmallRng::seed_from_u64(11)
    }

    #[test]
    fn numbers_are_eleven_ascii_digits_with_a_known_prefix() {
        let mut rng = test_rng();
        for _ in 0..200 {
            let phone = generate_phone_number(&mut rng, None, None).unwrap();
            assert_eq!(phone.len(), 11);
            assert!(phone.bytes().all(|b| b.is_ascii_digit()));
            assert!(
                ALL_PREFIXES.iter().any(|p| phone.starts_with(p)),
                "no segment matches {}",
                phone
            );
        }
    }

    #[test]
    fn carrier_constrained_numbers_use_that_carriers_segments() {
        let mut rng = test_rng();
        for carrier in [
            Carrier::Mobile,
            Carrier::Unicom,
            Carrier::Telecom,
            Carrier::Virtual,
        ] {
            let phones =
                generate_phone_numbers(&mut rng, 50, None, Some(carrier), false).unwrap();
            assert_eq!(phones.len(), 50);
            for phone in phones {
                assert!(
                    carrier.prefixes().iter().any(|p| phone.starts_with(p)),
                    "{} does not match a {} segment",
                    phone,
                    carrier.display_name()
                );
            }
        }
    }

    #[test]
    fn explicit_prefix_is_honored() {
        let mut rng = test_rng();
        let phones = generate_phone_numbers(&mut rng, 5, Some("138"), None, true).unwrap();
        assert_eq!(phones.len(), 5);
        for phone in phones {
            assert!(phone.starts_with("138"));
            assert_eq!(phone.len(), 11);
        }
    }

    #[test]
    fn unknown_prefix_is_rejected() {
        let mut rng = test_rng();
        let result = generate_phone_number(&mut rng, Some("123"), None);
        assert_eq!(
            result,
            Err(PhoneError::UnsupportedPrefix("123".to_string()))
        );
    }

    #[test]
    fn unique_batches_contain_no_duplicates() {
        let mut rng = test_rng();
        let phones =
            generate_phone_numbers(&mut rng, 50, None, Some(Carrier::Mobile), true).unwrap();
        assert_eq!(phones.len(), 50);
        let distinct: HashSet<&String> = phones.iter().collect();
        assert_eq!(distinct.len(), 50);
    }

    #[test]
    fn non_unique_batches_return_exactly_the_requested_count() {
        let mut rng = test_rng();
        let phones = generate_phone_numbers(&mut rng, 73, None, None, false).unwrap();
        assert_eq!(phones.len(), 73);
    }

    #[test]
    fn zero_count_yields_empty_list() {
        let mut rng = test_rng();
        assert!(
            generate_phone_numbers(&mut rng, 0, None, None, true)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn classification_round_trips_for_every_carrier() {
        let mut rng = test_rng();
        for carrier in [
            Carrier::Mobile,
            Carrier::Unicom,
            Carrier::Telecom,
            Carrier::Virtual,
        ] {
            for phone in
                generate_phone_numbers(&mut rng, 30, None, Some(carrier), false).unwrap()
            {
                assert_eq!(get_carrier_name(&phone), carrier.display_name());
            }
        }
    }

    // Known exception: "1440" is accepted for generation but the 3-character
    // classification cannot see it.
    #[test]
    fn data_card_segment_classifies_as_unknown_carrier() {
        let mut rng = test_rng();
        let phone = generate_phone_number(&mut rng, Some("1440"), None).unwrap();
        assert_eq!(phone.len(), 11);
        assert!(phone.starts_with("1440"));
        assert_eq!(get_carrier_name(&phone), "未知运营商");
    }

    #[test]
    fn short_or_empty_input_is_unknown() {
        assert_eq!(get_carrier_name(""), "未知");
        assert_eq!(get_carrier_name("13"), "未知");
    }

    #[test]
    fn statistics_count_all_segments() {
        let stats = statistics();
        assert_eq!(
            stats.total_prefixes,
            stats.mobile_prefixes
                + stats.unicom_prefixes
                + stats.telecom_prefixes
                + stats.virtual_prefixes
                + DATA_CARD_PREFIXES.len()
        );
        assert_eq!(stats.supported_prefixes.len(), stats.total_prefixes);
    }
}
