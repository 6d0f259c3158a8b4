#[cfg(test)]
mod test {
    use super::super::{ord::rpmvercmp, Evr};
    use std::cmp::Ordering::*;

    #[test]
    fn rpmvercmp_ord() {
        let source = vec![
            ("1.0", Equal, "1.0"),
            ("1.0", Less, "2.0"),
            ("2.0", Greater, "1.0"),
            ("2.0.1", Equal, "2.0.1"),
            ("2.0", Less, "2.0.1"),
            ("2.0.1a", Equal, "2.0.1a"),
            ("2.0.1a", Greater, "2.0.1"),
            ("5.5p1", Equal, "5.5p1"),
            ("5.5p1", Less, "5.5p2"),
            ("5.5p10", Greater, "5.5p1"),
            ("10xyz", Less, "10.1xyz"),
            ("xyz10", Equal, "xyz10"),
            ("xyz10", Less, "xyz10.1"),
            ("xyz.4", Equal, "xyz.4"),
            ("xyz.4", Less, "8"),
            ("xyz.4", Less, "2"),
            ("5.5p2", Less, "5.6p1"),
            ("5.6p1", Less, "6.5p1"),
            ("6.0.rc1", Greater, "6.0"),
            ("10b2", Greater, "10a1"),
            ("10a2", Less, "10b2"),
            ("1.0aa", Equal, "1.0aa"),
            ("1.0a", Less, "1.0aa"),
            ("10.0001", Equal, "10.0001"),
            ("10.0001", Equal, "10.1"),
            ("10.0001", Less, "10.0039"),
            ("4.999.9", Less, "5.0"),
            ("20101121", Equal, "20101121"),
            ("20101121", Less, "20101122"),
            ("2_0", Equal, "2_0"),
            ("2.0", Equal, "2_0"),
            ("a", Equal, "a"),
            ("a+", Equal, "a+"),
            ("a+", Equal, "a_"),
            ("+a", Equal, "+a"),
            ("+a", Equal, "_a"),
            ("+_", Equal, "_+"),
            ("+", Equal, "_"),
            ("1.0~rc1", Equal, "1.0~rc1"),
            ("1.0~rc1", Less, "1.0"),
            ("1.0~rc1", Less, "1.0~rc2"),
            ("1.0~rc1~git123", Less, "1.0~rc1"),
            ("1.0^", Equal, "1.0^"),
            ("1.0^", Greater, "1.0"),
            ("1.0^git1", Greater, "1.0"),
            ("1.0^git1", Less, "1.01"),
            ("1.0^20160101", Less, "1.0.1"),
            ("1.0^20160101^git1", Less, "1.0^20160102"),
            ("1.0~rc1^git1", Greater, "1.0~rc1"),
            ("1.0^git1~pre", Less, "1.0^git1"),
        ];

        for (a, expected, b) in source {
            assert_eq!(rpmvercmp(a, b), expected, "{} vs {}", a, b);
            assert_eq!(rpmvercmp(b, a), expected.reverse(), "{} vs {}", b, a);
        }
    }

    #[test]
    fn evr_ord() {
        let source = vec![
            ("1:1.0-1", Greater, "2.0-1"),
            ("0:1.0-1", Equal, "1.0-1"),
            ("1.0-1", Less, "1.0-2"),
            ("1.0", Less, "1.0-1"),
            ("1.2-1", Less, "1.3-1"),
            ("2:0.1-1", Greater, "1:9.9-9"),
            ("5.1-4.el9", Greater, "5.1-4.el8"),
            ("5.1-4.el9_1", Greater, "5.1-4.el9"),
        ];

        for (a, expected, b) in source {
            let this = Evr::try_from(a).unwrap();
            let that = Evr::try_from(b).unwrap();
            assert_eq!(this.cmp(&that), expected, "{} vs {}", a, b);
        }
    }

    #[test]
    fn evr_ord_is_transitive() {
        let mut versions: Vec<Evr> = vec![
            "1.0~rc1-1",
            "1.0-1",
            "1.0^git1-1",
            "1.0.1-1",
            "1:0.1-1",
            "1.0a-1",
            "1.0-1.el9",
            "0.9-10",
        ]
        .into_iter()
        .map(|v| Evr::try_from(v).unwrap())
        .collect();
        versions.sort();

        for (i, a) in versions.iter().enumerate() {
            for b in &versions[i..] {
                assert!(a <= b, "{} <= {}", a, b);
                for c in &versions[i..] {
                    if a <= b && b <= c {
                        assert!(a <= c, "{} <= {}", a, c);
                    }
                }
            }
        }
    }
}
