//! VATEX exemption reason codes (ZATCA code list).
//!
//! Lines in zero-rated, exempt and out-of-scope categories carry a reason
//! code and text that is copied into the VAT breakdown.

use super::types::TaxCategory;

/// Check whether `code` is a known VATEX-SA reason code.
pub fn is_known_exemption_reason(code: &str) -> bool {
    exemption_reason_text(code).is_some()
}

/// Official reason text for a VATEX-SA code.
pub fn exemption_reason_text(code: &str) -> Option<&'static str> {
    EXEMPTION_REASONS
        .binary_search_by_key(&code, |(c, _)| *c)
        .ok()
        .map(|i| EXEMPTION_REASONS[i].1)
}

/// Reason code and text filled in for a category when none is given.
pub fn default_exemption_reason(category: TaxCategory) -> Option<(&'static str, &'static str)> {
    let code = match category {
        TaxCategory::Exempt => "VATEX-SA-29",
        TaxCategory::ZeroRated => "VATEX-SA-36",
        TaxCategory::StandardRate | TaxCategory::NotSubjectToVat => return None,
    };
    exemption_reason_text(code).map(|text| (code, text))
}

/// Sorted by code for binary search.
static EXEMPTION_REASONS: &[(&str, &str)] = &[
    ("VATEX-SA-29", "Financial services mentioned in Article 29 of the VAT Regulations"),
    ("VATEX-SA-29-7", "Life insurance services mentioned in Article 29 of the VAT Regulations"),
    ("VATEX-SA-30", "Real estate transactions mentioned in Article 30 of the VAT Regulations"),
    ("VATEX-SA-32", "Export of goods"),
    ("VATEX-SA-33", "Export of services"),
    ("VATEX-SA-34-1", "The international transport of Goods"),
    ("VATEX-SA-34-2", "International transport of passengers"),
    ("VATEX-SA-34-3", "Services directly connected and incidental to a Supply of international passenger transport"),
    ("VATEX-SA-34-4", "Supply of a qualifying means of transport"),
    ("VATEX-SA-34-5", "Any services relating to Goods or passenger transportation, as defined in article twenty five of these Regulations"),
    ("VATEX-SA-35", "Medicines and medical equipment"),
    ("VATEX-SA-36", "Qualifying metals"),
    ("VATEX-SA-EDU", "Private education to citizen"),
    ("VATEX-SA-HEA", "Private healthcare to citizen"),
    ("VATEX-SA-MLTRY", "Supply of qualified military goods"),
    ("VATEX-SA-OOS", "Reason is free text, to be provided by the taxpayer on case to case basis"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes() {
        assert!(is_known_exemption_reason("VATEX-SA-29"));
        assert!(is_known_exemption_reason("VATEX-SA-34-3"));
        assert!(is_known_exemption_reason("VATEX-SA-OOS"));
    }

    #[test]
    fn unknown_codes() {
        assert!(!is_known_exemption_reason(""));
        assert!(!is_known_exemption_reason("VATEX-SA-31"));
        assert!(!is_known_exemption_reason("vatex-sa-29"));
    }

    #[test]
    fn defaults_per_category() {
        assert_eq!(
            default_exemption_reason(TaxCategory::Exempt).map(|(c, _)| c),
            Some("VATEX-SA-29")
        );
        assert_eq!(
            default_exemption_reason(TaxCategory::ZeroRated),
            Some(("VATEX-SA-36", "Qualifying metals"))
        );
        assert_eq!(default_exemption_reason(TaxCategory::StandardRate), None);
        assert_eq!(default_exemption_reason(TaxCategory::NotSubjectToVat), None);
    }

    #[test]
    fn list_is_sorted() {
        for window in EXEMPTION_REASONS.windows(2) {
            assert!(
                window[0].0 < window[1].0,
                "reason codes not sorted: {} >= {}",
                window[0].0,
                window[1].0
            );
        }
    }
}
