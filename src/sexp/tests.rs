use super::{Atom, RenderMode, Sexp, SexpMap};

fn sample_pairs() -> Vec<(Atom, Sexp)> {
    vec![
        (
            Atom::new("a"),
            Sexp::List(vec![Sexp::Int(1), Sexp::Int(2), Sexp::Int(3)]),
        ),
        (Atom::new("b"), Sexp::Int(1)),
        (Atom::new("c"), Sexp::text("asdf")),
    ]
}

#[test]
fn numbers_encode_as_decimal_text() {
    assert_eq!(Sexp::Int(42).encode(), "42");
    assert_eq!(Sexp::Int(-7).encode(), "-7");
    assert_eq!(Sexp::Float(1.5).encode(), "1.5");
}

#[test]
fn atoms_encode_with_hyphens_for_underscores() {
    assert_eq!(Sexp::atom("foobar").encode(), "foobar");
    assert_eq!(Sexp::atom("foo_bar").encode(), "foo-bar");
    assert_eq!(Sexp::atom("mouse_1").encode(), "mouse-1");
}

#[test]
fn keyword_prefixes_a_colon() {
    assert_eq!(Atom::new("foobar").keyword().name(), ":foobar");
}

#[test]
fn keyword_is_idempotent() {
    let a = Atom::new("foobar");
    assert_eq!(a.keyword().keyword(), a.keyword());
    assert_eq!(Atom::new(":already").keyword().name(), ":already");
}

#[test]
fn strings_encode_quoted_with_escapes() {
    assert_eq!(Sexp::text("asdf\nfoobar").encode(), "\"asdf\\nfoobar\"");
    assert_eq!(Sexp::text("say \"hi\"").encode(), "\"say \\\"hi\\\"\"");
    assert_eq!(Sexp::text("back\\slash").encode(), "\"back\\\\slash\"");
    assert_eq!(Sexp::text("tab\there").encode(), "\"tab\\there\"");
}

#[test]
fn lists_encode_space_joined() {
    let list = Sexp::List(vec![Sexp::Int(1), Sexp::Int(2), Sexp::Int(3), Sexp::Int(4)]);
    assert_eq!(list.encode(), "(1 2 3 4)");
}

#[test]
fn lists_nest() {
    let list = Sexp::List(vec![
        Sexp::Int(1),
        Sexp::Int(2),
        Sexp::List(vec![Sexp::Int(3), Sexp::Int(4)]),
        Sexp::Int(5),
        Sexp::Int(6),
    ]);
    assert_eq!(list.encode(), "(1 2 (3 4) 5 6)");
}

#[test]
fn lists_mix_atoms_and_numbers() {
    let list = Sexp::List(vec![
        Sexp::atom("a"),
        Sexp::Int(1),
        Sexp::atom("b"),
        Sexp::Int(2),
    ]);
    assert_eq!(list.encode(), "(a 1 b 2)");
}

#[test]
fn empty_list_encodes_to_unit() {
    assert_eq!(Sexp::List(Vec::new()).encode(), "()");
}

#[test]
fn map_renders_as_plist() {
    let map = Sexp::Map(SexpMap::plist(sample_pairs()));
    assert_eq!(map.encode(), "(:a (1 2 3) :b 1 :c \"asdf\")");
}

#[test]
fn map_renders_as_alist() {
    let map = Sexp::Map(SexpMap::alist(sample_pairs()));
    assert_eq!(map.encode(), "((a . (1 2 3)) (b . 1) (c . \"asdf\"))");
}

#[test]
fn map_renders_as_flat_list() {
    let map = Sexp::Map(SexpMap::flat(sample_pairs()));
    assert_eq!(map.encode(), "(a (1 2 3) b 1 c \"asdf\")");
}

#[test]
fn map_defaults_to_plist() {
    assert_eq!(RenderMode::default(), RenderMode::Plist);
}

#[test]
fn retagging_keeps_pairs_intact() {
    let plist = SexpMap::plist(sample_pairs());
    let flat = plist.clone().with_mode(RenderMode::Flat);
    assert_eq!(flat.mode(), RenderMode::Flat);
    assert_eq!(flat.pairs(), plist.pairs());
}

#[test]
fn plist_keys_already_keyword_shaped_stay_single_colon() {
    let map = SexpMap::plist(vec![(Atom::new(":pre"), Sexp::Int(1))]);
    assert_eq!(Sexp::Map(map).encode(), "(:pre 1)");
}

#[test]
fn empty_map_renders_to_unit_in_every_mode() {
    for mode in [RenderMode::Flat, RenderMode::Alist, RenderMode::Plist] {
        let map = SexpMap::plist(Vec::new()).with_mode(mode);
        assert_eq!(Sexp::Map(map).encode(), "()");
    }
}

#[test]
fn plist_keys_with_underscores_get_hyphenated_keywords() {
    let map = SexpMap::plist(vec![(Atom::new("mouse_1"), Sexp::atom("handler_fn"))]);
    assert_eq!(Sexp::Map(map).encode(), "(:mouse-1 handler-fn)");
}

#[test]
#[should_panic(expected = "invalid atom name")]
fn atoms_reject_whitespace_at_construction() {
    Atom::new("not a symbol");
}

#[test]
#[should_panic(expected = "invalid atom name")]
fn atoms_reject_empty_names() {
    Atom::new("");
}
