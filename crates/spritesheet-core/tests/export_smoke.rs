use spritesheet_core::prelude::*;

fn packed(items: Vec<(&str, u32, u32)>, padding: u32, w: u32, h: u32) -> SheetMetadata {
    let cfg = SheetConfig::builder().padding(padding).build();
    let mut p = SpritePacker::from_layout(items, cfg).expect("packer");
    p.pack_fixed(w, h).expect("fits");
    p.metadata().expect("metadata")
}

#[test]
fn lua_single_entry_exact_text() {
    let meta = packed(vec![("hero", 60, 28)], 2, 128, 64);
    let expected = "{\n\thero =\n\t{\n\t\tX = 2,\n\t\tY = 2,\n\t\tW = 60,\n\t\tH = 28,\n\t\tnormX = 0.015625,\n\t\tnormY = 0.03125,\n\t\tnormW = 0.46875,\n\t\tnormH = 0.4375\n\t}\n}\n";
    assert_eq!(to_lua(&meta), expected);
}

#[test]
fn lua_entries_have_no_trailing_separator() {
    let meta = packed(vec![("b", 10, 10), ("a", 10, 10), ("c", 10, 10)], 0, 30, 10);
    let lua = to_lua(&meta);
    assert!(lua.starts_with("{\n\ta =\n"));
    assert_eq!(lua.matches("\t},\n").count(), 2);
    assert!(lua.ends_with("\t}\n}\n"));
    assert!(!lua.contains("},\n}"));
    let a = lua.find("\ta =").expect("a");
    let b = lua.find("\tb =").expect("b");
    let c = lua.find("\tc =").expect("c");
    assert!(a < b && b < c, "entries are ordered by name");
}

#[test]
fn lua_quotes_names_that_are_not_identifiers() {
    let meta = packed(
        vec![("my-sprite", 4, 4), ("end", 4, 4), ("9lives", 4, 4), ("_ok1", 4, 4)],
        0,
        16,
        4,
    );
    let lua = to_lua(&meta);
    assert!(lua.contains("\t[\"my-sprite\"] =\n"));
    assert!(lua.contains("\t[\"end\"] =\n"));
    assert!(lua.contains("\t[\"9lives\"] =\n"));
    assert!(lua.contains("\t_ok1 =\n"));
}

#[test]
fn lua_escapes_quotes_and_control_characters() {
    let meta = packed(
        vec![("cr\rlf\n", 4, 4), ("tab\t1", 4, 4), ("say \"hi\\\"", 4, 4)],
        0,
        12,
        4,
    );
    let lua = to_lua(&meta);
    assert!(lua.contains("\t[\"cr\\013lf\\010\"] =\n"), "{lua}");
    assert!(lua.contains("\t[\"tab\\0091\"] =\n"), "{lua}");
    assert!(lua.contains("\t[\"say \\\"hi\\\\\\\"\"] =\n"), "{lua}");
    // no raw control characters other than the layout's own newlines and tabs
    for line in lua.lines() {
        assert!(!line.contains('\r'));
        assert!(line.trim_start_matches('\t').chars().all(|c| !c.is_control()));
    }
}

#[test]
fn lua_for_empty_metadata_is_an_empty_table() {
    let meta = SheetMetadata {
        app: "spritesheet".into(),
        version: "0".into(),
        width: 32,
        height: 32,
        padding: 2,
        sprites: vec![],
    };
    assert_eq!(to_lua(&meta), "{\n}\n");
}

#[test]
fn json_hash_shape() {
    let meta = packed(vec![("hero", 60, 28), ("coin", 8, 8)], 2, 128, 64);
    let v = to_json_hash(&meta, Some("sheet.png"));

    let hero = &v["sprites"]["hero"];
    assert_eq!(hero["X"], 2);
    assert_eq!(hero["Y"], 2);
    assert_eq!(hero["W"], 60);
    assert_eq!(hero["H"], 28);
    assert_eq!(hero["normX"].as_f64(), Some(0.015625));
    assert_eq!(hero["normH"].as_f64(), Some(0.4375));
    assert!(v["sprites"]["coin"].is_object());

    let m = &v["meta"];
    assert_eq!(m["app"], "spritesheet");
    assert_eq!(m["size"]["w"], 128);
    assert_eq!(m["size"]["h"], 64);
    assert_eq!(m["padding"], 2);
    assert_eq!(m["image"], "sheet.png");

    let bare = to_json_hash(&meta, None);
    assert!(bare["meta"].get("image").is_none());
}

#[test]
fn json_string_parses_back() {
    let meta = packed(vec![("a", 5, 5)], 1, 16, 16);
    let text = to_json_string(&meta, Some("a.png")).expect("json");
    let v: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(v["sprites"]["a"]["X"], 1);
}

#[test]
fn record_serializes_with_short_field_names() {
    let meta = packed(vec![("a", 5, 5)], 1, 16, 16);
    let v = serde_json::to_value(&meta.sprites[0]).expect("record");
    for key in ["name", "X", "Y", "W", "H", "normX", "normY", "normW", "normH"] {
        assert!(v.get(key).is_some(), "missing {key}");
    }
}
