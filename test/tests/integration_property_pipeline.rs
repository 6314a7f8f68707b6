/// Property get/set behavior against a recording bridge: defaults, encoding,
/// redundant write suppression, nocache properties and custom access.

use std::{cell::Cell, cell::RefCell, rc::Rc};

use serde_json::json;
use tessera_shared::{ClassSpec, EncodeError, PropertyConfig, PropertyType, TypeRef, Value};
use tessera_test::{
    started_context, test_classes::counting_class, BridgeCommand, Button, EventLog, TestClasses,
};

#[test]
fn default_is_returned_before_any_write() {
    let (context, bridge) = started_context();
    let classes = TestClasses::new();
    let widget = classes.widget.instantiate(&context).unwrap();

    assert_eq!(widget.get("opacity"), Some(json!(1.0)));
    assert_eq!(widget.get("visible"), Some(json!(true)));
    assert_eq!(bridge.gets_of(widget.cid(), "opacity"), 0);
}

#[test]
fn write_then_read_returns_value_and_fires_once() {
    let (context, bridge) = started_context();
    let classes = TestClasses::new();
    let widget = classes.widget.instantiate(&context).unwrap();
    let log = EventLog::new();
    log.attach(&widget, "change:opacity");

    widget.set("opacity", 0.5);
    assert_eq!(widget.get("opacity"), Some(json!(0.5)));
    assert_eq!(log.payloads("change:opacity"), vec![json!(0.5)]);

    widget.set("opacity", 0.5);
    assert_eq!(log.count("change:opacity"), 1);

    // redundant writes are still forwarded
    assert_eq!(
        bridge.sets_of(widget.cid(), "opacity"),
        vec![json!(0.5), json!(0.5)]
    );
}

#[test]
fn writing_the_default_is_not_a_change() {
    let (context, _bridge) = started_context();
    let classes = TestClasses::new();
    let widget = classes.widget.instantiate(&context).unwrap();
    let log = EventLog::new();
    log.attach(&widget, "change:visible");

    widget.set("visible", true);
    assert!(log.is_empty());
    assert_eq!(widget.get("visible"), Some(json!(true)));

    widget.set("visible", false);
    widget.set("visible", true);
    assert_eq!(
        log.payloads("change:visible"),
        vec![json!(false), json!(true)]
    );
}

#[test]
fn integer_and_float_forms_of_a_number_are_the_same_value() {
    let (context, bridge) = started_context();
    let classes = TestClasses::new();
    let class = ClassSpec::new("Dimmer")
        .property(
            "opacity",
            PropertyConfig::new().of_type("number").default_value(1),
        )
        .build(&classes.types)
        .unwrap();
    let dimmer = class.instantiate(&context).unwrap();
    let log = EventLog::new();
    log.attach(&dimmer, "change:opacity");

    dimmer.set("opacity", 1.0);
    dimmer.set("opacity", 1);
    dimmer.set("opacity", 1.0);
    assert!(log.is_empty());

    dimmer.set("opacity", 0.5);
    dimmer.set("opacity", 1);
    dimmer.set("opacity", 1.0);
    assert_eq!(log.payloads("change:opacity"), vec![json!(0.5), json!(1)]);
    assert_eq!(bridge.sets_of(dimmer.cid(), "opacity").len(), 6);
}

#[test]
fn unknown_property_is_ignored() {
    let (context, bridge) = started_context();
    let classes = TestClasses::new();
    let widget = classes.widget.instantiate(&context).unwrap();
    bridge.clear();
    let log = EventLog::new();
    log.attach(&widget, "change:opacity");

    widget.set("opacty", 0.2);

    assert!(bridge.is_empty());
    assert!(log.is_empty());
    assert_eq!(widget.get("opacty"), None);
    assert_eq!(widget.get("opacity"), Some(json!(1.0)));
}

#[test]
fn rejected_value_keeps_previous_state() {
    let (context, bridge) = started_context();
    let classes = TestClasses::new();
    let widget = classes.widget.instantiate(&context).unwrap();
    widget.set("opacity", 0.25);
    let log = EventLog::new();
    log.attach(&widget, "change:opacity");

    widget.set("opacity", 1.5);
    widget.set("opacity", "opaque");

    assert_eq!(widget.get("opacity"), Some(json!(0.25)));
    assert!(log.is_empty());
    assert_eq!(bridge.sets_of(widget.cid(), "opacity"), vec![json!(0.25)]);
}

#[test]
fn values_are_stored_in_encoded_form() {
    let (context, bridge) = started_context();
    let classes = TestClasses::new();
    let canvas = classes.layout.instantiate(&context).unwrap();

    canvas.set("width", 10.4);
    assert_eq!(canvas.stored_property("width"), Some(json!(10)));
    assert_eq!(bridge.sets_of(canvas.cid(), "width"), vec![json!(10)]);

    let log = EventLog::new();
    log.attach(&canvas, "change:width");
    // encodes to the same stored value
    canvas.set("width", 9.6);
    assert!(log.is_empty());
}

#[test]
fn missing_value_is_read_from_native_side_every_time() {
    let (context, bridge) = started_context();
    let classes = TestClasses::new();
    let device = classes.device.instantiate(&context).unwrap();
    bridge.set_native_value(device.cid(), "orientation", json!("portrait"));

    assert_eq!(device.get("orientation"), Some(json!("portrait")));
    bridge.set_native_value(device.cid(), "orientation", json!("landscape"));
    assert_eq!(device.get("orientation"), Some(json!("landscape")));

    assert_eq!(bridge.gets_of(device.cid(), "orientation"), 2);
}

#[test]
fn nocache_property_echoes_every_write() {
    let (context, bridge) = started_context();
    let classes = TestClasses::new();
    let device = classes.device.instantiate(&context).unwrap();
    let log = EventLog::new();
    log.attach(&device, "change:brightness");

    device.set("brightness", 0.3);
    device.set("brightness", 0.3);

    assert_eq!(log.payloads("change:brightness"), vec![json!(0.3), json!(0.3)]);
    assert_eq!(device.stored_property("brightness"), None);
    assert_eq!(bridge.sets_of(device.cid(), "brightness").len(), 2);

    bridge.set_native_value(device.cid(), "brightness", json!(0.7));
    assert_eq!(device.get("brightness"), Some(json!(0.7)));
}

#[test]
fn lazy_default_is_evaluated_on_each_read() {
    let (context, _bridge) = started_context();
    let classes = TestClasses::new();
    let evaluations = Rc::new(Cell::new(0));
    let clock = counting_class(&classes.types, evaluations.clone())
        .instantiate(&context)
        .unwrap();

    assert_eq!(clock.get("time"), Some(json!(1)));
    assert_eq!(clock.get("time"), Some(json!(2)));
    assert_eq!(evaluations.get(), 2);

    // the redundancy check compares against the default once
    clock.set("time", 100);
    assert_eq!(evaluations.get(), 3);
    assert_eq!(clock.get("time"), Some(json!(100)));
    assert_eq!(evaluations.get(), 3);
}

#[test]
fn bulk_set_follows_reorder_hook() {
    let (context, bridge) = started_context();
    let classes = TestClasses::new();
    let canvas = classes.layout.instantiate(&context).unwrap();
    bridge.clear();

    canvas.set_all(vec![
        ("left", json!(5)),
        ("top", json!(6)),
        ("height", json!(20)),
        ("opacity", json!(0.5)),
        ("width", json!(10)),
    ]);

    assert_eq!(
        bridge.set_order(canvas.cid()),
        vec!["height", "width", "left", "top", "opacity"]
    );
}

#[test]
fn bulk_set_skips_unknown_and_rejected_entries() {
    let (context, bridge) = started_context();
    let classes = TestClasses::new();
    let widget = classes.widget.instantiate(&context).unwrap();
    bridge.clear();

    widget.set_all(vec![
        ("opacity", json!(3)),
        ("colour", json!("red")),
        ("background", json!("red")),
    ]);

    assert_eq!(bridge.set_order(widget.cid()), vec!["background"]);
    assert_eq!(widget.get("opacity"), Some(json!(1.0)));
}

#[test]
fn custom_access_replaces_default_strategies() {
    let (context, bridge) = started_context();
    let classes = TestClasses::new();
    let written = Rc::new(RefCell::new(Vec::new()));
    let sink = written.clone();
    let class = ClassSpec::new("Gauge")
        .property(
            "level",
            PropertyConfig::new()
                .of_type("number")
                .getter(|_, _| Some(json!(42)))
                .setter(move |object, name, value| {
                    sink.borrow_mut().push(value.clone());
                    object.store_property(name, Some(value));
                }),
        )
        .build(&classes.types)
        .unwrap();
    let gauge = class.instantiate(&context).unwrap();

    gauge.set("level", 7);

    assert_eq!(*written.borrow(), vec![json!(7)]);
    assert_eq!(gauge.get("level"), Some(json!(42)));
    assert!(bridge.sets_of(gauge.cid(), "level").is_empty());
}

#[test]
fn registered_type_decodes_on_read_only() {
    let (context, bridge) = started_context();
    let mut classes = TestClasses::new();
    classes.types.register(
        PropertyType::new("percent")
            .with_encoder(|value, _| {
                let number = value
                    .as_f64()
                    .ok_or_else(|| EncodeError::Custom("not a number".to_string()))?;
                Ok(json!(number / 100.0))
            })
            .with_decoder(|value, _| json!(value.as_f64().unwrap_or_default() * 100.0)),
    );
    let class = ClassSpec::new("Progress")
        .property("value", TypeRef::named("percent"))
        .build(&classes.types)
        .unwrap();
    let progress = class.instantiate(&context).unwrap();
    let log = EventLog::new();
    log.attach(&progress, "change:value");

    progress.set("value", 50);

    assert_eq!(bridge.sets_of(progress.cid(), "value"), vec![json!(0.5)]);
    assert_eq!(progress.stored_property("value"), Some(json!(0.5)));
    assert_eq!(progress.get("value"), Some(json!(50.0)));
    assert_eq!(log.payloads("change:value"), vec![json!(50.0)]);
}

#[test]
fn typed_accessors_convert_values() {
    let (context, bridge) = started_context();
    let classes = TestClasses::new();
    let button = Button::new(&context, &classes).unwrap();

    assert_eq!(button.opacity(), Some(1.0));
    assert_eq!(button.text(), Some(String::new()));
    assert_eq!(button.alignment(), Some("center".to_string()));

    button.set_text("Submit".to_string()).set_visible(false);
    button.set_alignment("diagonal".to_string());

    assert_eq!(button.text(), Some("Submit".to_string()));
    assert_eq!(button.visible(), Some(false));
    assert_eq!(button.alignment(), Some("center".to_string()));
    assert!(bridge
        .commands_for(button.object().cid())
        .contains(&BridgeCommand::Set {
            cid: button.object().cid().clone(),
            name: "text".to_string(),
            value: Value::from("Submit"),
        }));
}

#[test]
fn set_returns_self_for_chaining() {
    let (context, _bridge) = started_context();
    let classes = TestClasses::new();
    let widget = classes.widget.instantiate(&context).unwrap();

    widget.set("opacity", 0.1).set("background", "blue");

    assert_eq!(widget.get("opacity"), Some(json!(0.1)));
    assert_eq!(widget.get("background"), Some(json!("blue")));
}
