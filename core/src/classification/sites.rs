//! Heuristics shipped with the crate, one per acquisition site

const SITES: [(&str, &str); 8] = [
    ("generic", include_str!("../../heuristics/generic.json")),
    ("hchs", include_str!("../../heuristics/hchs.json")),
    ("hchs_hno", include_str!("../../heuristics/hchs_hno.json")),
    ("ncl2", include_str!("../../heuristics/ncl2.json")),
    ("arctic", include_str!("../../heuristics/arctic.json")),
    ("sfbc1", include_str!("../../heuristics/sfbc1.json")),
    ("asl", include_str!("../../heuristics/asl.json")),
    ("wu", include_str!("../../heuristics/wu.json")),
];

/// JSON source of a built-in heuristic
pub fn source(site: &str) -> Option<&'static str> {
    SITES
        .iter()
        .find(|(name, _)| *name == site)
        .map(|(_, json)| *json)
}

pub fn names() -> impl Iterator<Item = &'static str> {
    SITES.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::Heuristic;
    use crate::types::SequenceRecord;

    #[test]
    fn test_all_sites_build() {
        for site in names() {
            let heuristic = Heuristic::builtin(site)
                .unwrap_or_else(|e| panic!("built-in heuristic '{}' is invalid: {}", site, e));
            assert_eq!(heuristic.name(), site);
            assert!(!heuristic.rules().is_empty());
        }
    }

    #[test]
    fn test_generic_uses_containment_for_anatomy() {
        let heuristic = Heuristic::builtin("generic").unwrap();
        let records = vec![
            SequenceRecord::new("2-t1").with_description("t1_mprage_cor_ND_repeat"),
            SequenceRecord::new("3-flair").with_description("3D_Flair_sag"),
            SequenceRecord::new("4-dwi").with_description("ep2d_diff_96dir_7b0_3shell_ORIG"),
            SequenceRecord::new("5-dwi").with_description("ep2d_diff_96dir_7b0_3shell_ORIG_ADC"),
        ];

        let result = heuristic.classify(&records).unwrap();
        assert_eq!(result.get(heuristic.key("t1w").unwrap()).unwrap(), ["2-t1"]);
        assert_eq!(result.get(heuristic.key("flair").unwrap()).unwrap(), ["3-flair"]);
        assert_eq!(result.get(heuristic.key("dwi").unwrap()).unwrap(), ["4-dwi"]);
        assert!(result.get(heuristic.key("func_rest").unwrap()).unwrap().is_empty());
    }

    #[test]
    fn test_hchs_alternatives_share_a_key() {
        let heuristic = Heuristic::builtin("hchs").unwrap();
        let records = vec![
            SequenceRecord::new("6").with_description("t2_tse_tra_ND"),
            SequenceRecord::new("7").with_description("ep2d_diff_tra_DTI_DFC"),
            SequenceRecord::new("8").with_description("t2_space_cor_p4_iso_ND"),
            SequenceRecord::new("9").with_description("ep2d_diff_tra_DTI_DFC_MIX"),
        ];

        let result = heuristic.classify(&records).unwrap();
        assert_eq!(result.get(heuristic.key("t2w").unwrap()).unwrap(), ["6", "8"]);
        assert_eq!(result.get(heuristic.key("dwi").unwrap()).unwrap(), ["7", "9"]);
    }

    #[test]
    fn test_arctic_routes_each_inversion_time_once() {
        let heuristic = Heuristic::builtin("arctic").unwrap();
        assert_eq!(heuristic.key_names().count(), 28);

        let records = vec![
            SequenceRecord::new("20").with_description("ss_TE00_TI0300"),
            SequenceRecord::new("21").with_description("ns_TE00_TI0300"),
            SequenceRecord::new("22").with_description("ss_TE00_TI1700"),
        ];
        let result = heuristic.classify(&records).unwrap();
        assert_eq!(result.get(heuristic.key("control_asl_03").unwrap()).unwrap(), ["20"]);
        assert_eq!(result.get(heuristic.key("label_asl_03").unwrap()).unwrap(), ["21"]);
        assert_eq!(result.get(heuristic.key("m0scan_17").unwrap()).unwrap(), ["22"]);
        assert_eq!(result.assignment_count(), 3);
    }

    #[test]
    fn test_asl_keys_list_label_before_control() {
        let asl = Heuristic::builtin("asl").unwrap();
        assert_eq!(
            asl.key_names().collect::<Vec<_>>(),
            ["label_asl", "control_asl", "m0scan"]
        );

        let arctic = Heuristic::builtin("arctic").unwrap();
        let names: Vec<&str> = arctic.key_names().collect();
        assert_eq!(&names[6..10], ["label_asl_03", "control_asl_03", "label_asl_06", "control_asl_06"]);
        assert_eq!(&names[26..], ["m0scan_17", "m0scan_34"]);
    }

    #[test]
    fn test_asl_blank_protocol_is_no_match() {
        let heuristic = Heuristic::builtin("asl").unwrap();
        let records = vec![
            SequenceRecord::new("5-ss")
                .with_description("ss_TE00_TI1700")
                .with_protocol("pcasl")
                .with_files(48),
            SequenceRecord::new("6-M0")
                .with_description("M0")
                .with_protocol("")
                .with_files(1),
        ];

        let result = heuristic.classify(&records).unwrap();
        assert_eq!(result.get(heuristic.key("control_asl").unwrap()).unwrap(), ["5-ss"]);
        assert!(result.get(heuristic.key("label_asl").unwrap()).unwrap().is_empty());
        assert!(result.get(heuristic.key("m0scan").unwrap()).unwrap().is_empty());
    }

    #[test]
    fn test_wu_matches_directory_names() {
        let heuristic = Heuristic::builtin("wu").unwrap();
        let records = vec![
            SequenceRecord::new("a").with_dir_name("FLAIR_TRA"),
            SequenceRecord::new("b").with_dir_name("DTI_64"),
            SequenceRecord::new("c").with_dir_name("PWI_perf"),
            SequenceRecord::new("d").with_dir_name("SURVEY"),
        ];
        let result = heuristic.classify(&records).unwrap();
        assert_eq!(result.get(heuristic.key("flair").unwrap()).unwrap(), ["a"]);
        assert_eq!(result.get(heuristic.key("dti").unwrap()).unwrap(), ["b"]);
        assert!(result.get(heuristic.key("dwi").unwrap()).unwrap().is_empty());
        assert_eq!(result.get(heuristic.key("dsc").unwrap()).unwrap(), ["c"]);
    }

    #[test]
    fn test_ncl2_single_t1_rule() {
        let heuristic = Heuristic::builtin("ncl2").unwrap();
        assert_eq!(heuristic.rules().len(), 1);
        let records = vec![
            SequenceRecord::new("301").with_description("CS sag T1W_3D_TFE nativ"),
            SequenceRecord::new("302").with_description("3D_T1w_MPRAGE"),
        ];
        let result = heuristic.classify(&records).unwrap();
        assert_eq!(result.get(heuristic.key("t1w").unwrap()).unwrap(), ["301"]);
    }

    #[test]
    fn test_unknown_site() {
        assert!(source("nowhere").is_none());
    }
}
