//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use koreasel::selector::constants::KOREA_KEYWORDS;
    use koreasel::selector::{is_korea_match, is_likely_country_selector, ControlDescriptor};
    use koreasel::Page;

    #[test]
    fn every_keyword_with_padding() {
        for keyword in KOREA_KEYWORDS {
            assert!(is_korea_match(keyword), "{keyword}");
            let padded = format!("Country: {keyword} ");
            assert!(is_korea_match(&padded), "{padded}");
        }
    }

    #[test]
    fn common_spellings() {
        for text in [
            "South Korea",
            "  KOREA  ",
            "Korea (Republic of)",
            "Korea, Rep.",
            "대한민국 (South Korea)",
            "KR - Korea",
            "+82 Korea",
            "Korea - 한국",
        ] {
            assert!(is_korea_match(text), "{text}");
        }
    }

    #[test]
    fn country_code_dropdown_without_korea() {
        let control = ControlDescriptor {
            name: "country_code".to_string(),
            is_native_dropdown: true,
            option_texts: vec!["+1".to_string(), "+81".to_string()],
            ..Default::default()
        };
        assert!(is_likely_country_selector(&control));
    }

    #[test]
    fn long_list_with_known_countries() {
        let mut option_texts = vec!["Pick".to_string()];
        option_texts.extend(
            [
                "Austria", "Belgium", "Canada", "Denmark", "Estonia", "Finland", "Japan",
                "Latvia", "Malta", "Norway",
            ]
            .iter()
            .map(|s| s.to_string()),
        );
        let control = ControlDescriptor {
            id: "sel-7".to_string(),
            is_native_dropdown: true,
            option_texts,
            ..Default::default()
        };
        assert!(is_likely_country_selector(&control));
    }

    #[test]
    fn descriptor_from_page() {
        let page = Page::parse(
            "<label for='where'>Where do you live?</label>\
             <input id='where' placeholder='Region' class='form-control'>",
            "https://example.com/",
        )
        .unwrap();
        let node = page.get_element_by_id("where").unwrap();
        let descriptor = ControlDescriptor::from_node(&page, &node);
        assert_eq!(descriptor.label_text, "Where do you live?");
        assert_eq!(descriptor.placeholder, "Region");
        assert!(!descriptor.is_native_dropdown);
        assert!(is_likely_country_selector(&descriptor));
    }
}

//  ███████╗ █████╗ ██╗██╗     ██╗███╗   ██╗ ██████╗
//  ██╔════╝██╔══██╗██║██║     ██║████╗  ██║██╔════╝
//  █████╗  ███████║██║██║     ██║██╔██╗ ██║██║  ███╗
//  ██╔══╝  ██╔══██║██║██║     ██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║██║███████╗██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚═╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod failing {
    use koreasel::selector::{is_korea_match, is_likely_country_selector, ControlDescriptor};

    #[test]
    fn unrelated_countries() {
        for text in ["Japan", "United States", "China", "Kyrgyzstan", "Kiribati", ""] {
            assert!(!is_korea_match(text), "{text}");
        }
    }

    #[test]
    fn short_codes_inside_words() {
        for text in ["milkround", "Krakow", "Ankara", "broken", "Rokycany", "4100"] {
            assert!(!is_korea_match(text), "{text}");
        }
    }

    #[test]
    fn north_korea() {
        for text in [
            "North Korea",
            "Korea (DPRK)",
            "조선민주주의인민공화국",
            "북한",
            "Nordkorea",
            "Corea del Norte",
            "Coreia do Norte",
            "Noord-Korea",
            "Corea del Nord",
        ] {
            assert!(!is_korea_match(text), "{text}");
        }
    }

    #[test]
    fn color_dropdown() {
        let control = ControlDescriptor {
            name: "color".to_string(),
            is_native_dropdown: true,
            option_texts: vec!["Red".into(), "Green".into(), "Blue".into()],
            ..Default::default()
        };
        assert!(!is_likely_country_selector(&control));
    }

    #[test]
    fn exactly_ten_options_are_not_sampled() {
        let control = ControlDescriptor {
            is_native_dropdown: true,
            option_texts: std::iter::once("Japan".to_string())
                .chain((0..9).map(|i| format!("Item {i}")))
                .collect(),
            ..Default::default()
        };
        assert!(!is_likely_country_selector(&control));
    }
}
