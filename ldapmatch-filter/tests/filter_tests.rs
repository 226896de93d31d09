// Copyright 2025 The LdapMatch Rust Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! End-to-end scenarios over parse, normalize and match, built around the
//! RFC 1960 examples.

use ldapmatch_filter::Filter;
use ldapmatch_filter::FilterExpression;
use ldapmatch_filter::Properties;
use ldapmatch_filter::PropertyValue;

fn props(pairs: &[(&str, &str)]) -> Properties {
    let mut props = Properties::new();
    for (k, v) in pairs {
        props.put(*k, *v);
    }
    props
}

#[test]
fn equal_is_case_sensitive_for_strings() {
    let filter = Filter::parse("(cn=Babs Jensen)").unwrap();
    assert!(filter.matches(&props(&[("cn", "Babs Jensen")])));
    assert!(!filter.matches(&props(&[("cn", "babs jensen")])));
}

#[test]
fn approx_folds_case_and_whitespace() {
    let filter = Filter::parse("(cn~=Babs Jensen)").unwrap();
    assert!(filter.matches(&props(&[("cn", "BABS JENSEN")])));
    assert!(filter.matches(&props(&[("cn", "babsjensen")])));
    assert!(!filter.matches(&props(&[("cn", "Tim Howes")])));
}

#[test]
fn substring_with_multiple_wildcards() {
    let filter = Filter::parse("(o=univ*of*mich*)").unwrap();
    assert!(filter.matches(&props(&[("o", "university of michigan")])));
    assert!(filter.matches(&props(&[("o", "univ of mich")])));
    assert!(!filter.matches(&props(&[("o", "michigan university")])));
}

#[test]
fn composite_and_or_filter() {
    let filter = Filter::parse("(&(objectClass=Person)(|(sn=Jensen)(cn=Babs J*)))").unwrap();

    // cn prefix branch of the OR
    assert!(filter.matches(&props(&[("objectClass", "Person"), ("cn", "Babs Jones")])));
    // sn branch of the OR
    assert!(filter.matches(&props(&[("objectClass", "Person"), ("sn", "Jensen")])));
    // AND fails on the first clause even though the OR would match
    assert!(!filter.matches(&props(&[("objectClass", "Computer"), ("sn", "Jensen")])));
    // neither OR branch
    assert!(!filter.matches(&props(&[("objectClass", "Person"), ("cn", "Tim Howes")])));
}

#[test]
fn negation() {
    let filter = Filter::parse("(!(cn=Tim Howes))").unwrap();
    assert!(filter.matches(&props(&[("cn", "Babs Jensen")])));
    assert!(!filter.matches(&props(&[("cn", "Tim Howes")])));
    // NOT over an absent property matches
    assert!(filter.matches(&Properties::new()));
}

#[test]
fn presence_versus_literal_star() {
    let presence = Filter::parse("(cn=*)").unwrap();
    let literal = Filter::parse("(cn=\\*)").unwrap();

    assert!(matches!(
        presence.expression(),
        FilterExpression::Present { .. }
    ));
    assert!(matches!(literal.expression(), FilterExpression::Equal { .. }));

    assert!(presence.matches(&props(&[("cn", "anything")])));
    assert!(!literal.matches(&props(&[("cn", "anything")])));
    assert!(literal.matches(&props(&[("cn", "*")])));
}

#[test]
fn multi_valued_properties_match_existentially() {
    let filter = Filter::parse("(cn=b)").unwrap();

    let mut multi = Properties::new();
    multi.put("cn", vec!["a", "b", "c"]);
    assert!(filter.matches(&multi));

    assert!(filter.matches(&props(&[("cn", "b")])));

    // an empty sequence matches no comparison but is still present
    let mut empty = Properties::new();
    empty.put("cn", PropertyValue::Vec(Vec::new()));
    assert!(!filter.matches(&empty));
    assert!(!Filter::parse("(cn<=z)").unwrap().matches(&empty));
    assert!(Filter::parse("(cn=*)").unwrap().matches(&empty));
}

#[test]
fn comparison_dispatches_on_stored_type() {
    let filter = Filter::parse("(x>=5)").unwrap();

    let mut numeric = Properties::new();
    numeric.put("x", 10i32);
    assert!(filter.matches(&numeric));

    // lexicographic for strings: "10" < "5"
    let mut textual = Properties::new();
    textual.put("x", "10");
    assert!(!textual.is_empty());
    assert!(!filter.matches(&textual));
}

#[test]
fn numeric_widths_and_version_values() {
    let mut props = Properties::new();
    props.put("small", 7i8);
    props.put("wide", 7_000_000_000i64);
    props.put("ratio", 0.5f64);
    props.put(
        "release",
        PropertyValue::Version("1.4.0.beta-2".parse().unwrap()),
    );

    assert!(Filter::parse("(small=7)").unwrap().matches(&props));
    assert!(Filter::parse("(wide>=7000000000)").unwrap().matches(&props));
    assert!(Filter::parse("(ratio<=0.5)").unwrap().matches(&props));
    assert!(Filter::parse("(release>=1.4)").unwrap().matches(&props));
    assert!(!Filter::parse("(release>=2)").unwrap().matches(&props));
}

#[test]
fn round_trip_normalization_preserves_semantics() {
    let fixtures = [
        "(cn=Babs Jensen)",
        "( cn =Babs Jensen)",
        "(&(a=1)(b=2)(c=3))",
        "(|(a=1)(!(b=2)))",
        "(o=univ*of*mich*)",
        "(o=*)",
        "(o=\\*)",
        "(o=a\\(b\\)c)",
        "(a~= b c )",
        "(&a=b)",
        "(x>=5)",
        "(x<=5)",
    ];

    for fixture in fixtures {
        let first = Filter::parse(fixture).unwrap();
        let reparsed = Filter::parse(first.filter_string()).unwrap();
        assert_eq!(first, reparsed, "round-trip changed {fixture}");
        assert_eq!(
            first.filter_string(),
            reparsed.filter_string(),
            "normalization not a fixed point for {fixture}"
        );
    }
}

#[test]
fn malformed_filters_are_rejected() {
    for malformed in [
        "",
        "(",
        ")",
        "(cn=Babs Jensen",
        "cn=a)",
        "(=b)",
        "(a>b)",
        "(a=b))",
        "(a=b(c)",
        "(a~=)",
    ] {
        assert!(Filter::parse(malformed).is_err(), "{malformed:?}");
    }
}
