// Copyright 2021-2022 System76 <info@system76.com>
// SPDX-License-Identifier: MPL-2.0

use pop_system_updater_widget::layout::{self, CHECK_FOR_UPDATES};
use pop_system_updater_widget::{
    attach, AttachError, AttachState, AttachmentHandle, HostContainer, Localizer, NodeRef, Store,
    UnknownKey, WidgetId, WidgetKind,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Insert(WidgetId),
    Remove(WidgetId),
    SetText(WidgetId, String),
}

/// Records every call the core makes into the host.
#[derive(Default)]
struct Recorder {
    destroyed: Cell<bool>,
    children: RefCell<Vec<WidgetId>>,
    calls: RefCell<Vec<Call>>,
    kinds: RefCell<HashMap<WidgetId, WidgetKind>>,
}

impl Recorder {
    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    fn texts(&self) -> Vec<(WidgetId, String)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::SetText(id, text) => Some((*id, text.clone())),
                _ => None,
            })
            .collect()
    }

    fn record_kinds(&self, node: NodeRef<'_>) {
        self.kinds.borrow_mut().insert(node.id(), node.kind());
        for child in node.children() {
            self.record_kinds(child);
        }
    }
}

impl HostContainer for Recorder {
    fn is_live(&self) -> bool {
        !self.destroyed.get()
    }

    fn insert_child(&self, root: NodeRef<'_>) {
        self.record_kinds(root);
        self.children.borrow_mut().push(root.id());
        self.calls.borrow_mut().push(Call::Insert(root.id()));
    }

    fn remove_child(&self, root: WidgetId) {
        self.children.borrow_mut().retain(|id| *id != root);
        self.calls.borrow_mut().push(Call::Remove(root));
    }

    fn set_text(&self, node: WidgetId, text: &str) {
        self.calls
            .borrow_mut()
            .push(Call::SetText(node, text.to_owned()));
    }
}

/// English text for every layout key, French only for the check button.
fn scenario_store() -> Store {
    let mut resource = String::from("{\n");
    for key in layout::KEYS {
        if key == CHECK_FOR_UPDATES {
            resource.push_str(
                r#""btn.check": { "en": "Check for updates", "fr": "Vérifier les mises à jour" },"#,
            );
        } else {
            resource.push_str(&format!("{:?}: {{ \"en\": {:?} }},", key, key.to_uppercase()));
        }
        resource.push('\n');
    }
    resource.push('}');

    Store::load(&resource, "en").unwrap()
}

fn check_button(handle: &AttachmentHandle) -> WidgetId {
    handle
        .tree()
        .visit(handle.root())
        .find(|node| node.text_key() == Some(CHECK_FOR_UPDATES))
        .map(|node| node.id())
        .unwrap()
}

#[test]
fn check_button_follows_the_locale() {
    let localizer = Localizer::new(scenario_store());
    let container = Rc::new(Recorder::default());

    let mut handle = attach(&container, &localizer).unwrap();
    let button = check_button(&handle);
    assert_eq!(container.kinds.borrow().get(&button), Some(&WidgetKind::Button));

    localizer.localize(&mut handle, "en").unwrap();
    container.clear();

    localizer.localize(&mut handle, "fr").unwrap();
    assert_eq!(
        container.texts(),
        vec![(button, String::from("Vérifier les mises à jour"))]
    );

    container.clear();
    localizer.localize(&mut handle, "de").unwrap();
    assert_eq!(container.texts(), vec![(button, String::from("Check for updates"))]);
    assert_eq!(pop_system_updater_widget::locale::current(), "de");
}

#[test]
fn repeated_localization_is_idempotent() {
    let localizer = Localizer::new(Store::bundled("en").unwrap());
    let container = Rc::new(Recorder::default());
    let mut handle = attach(&container, &localizer).unwrap();

    localizer.localize(&mut handle, "fr").unwrap();
    let first = container.calls();

    let report = localizer.localize(&mut handle, "fr").unwrap();
    assert_eq!(report.applied, 0);
    assert_eq!(container.calls(), first);
}

#[test]
fn text_is_applied_parent_before_children() {
    let localizer = Localizer::new(Store::bundled("en").unwrap());
    let container = Rc::new(Recorder::default());
    let mut handle = attach(&container, &localizer).unwrap();

    localizer.localize(&mut handle, "en").unwrap();
    container.clear();
    localizer.localize(&mut handle, "es").unwrap();

    let applied: Vec<WidgetId> = container.texts().into_iter().map(|(id, _)| id).collect();
    let expected: Vec<WidgetId> = handle
        .tree()
        .visit(handle.root())
        .filter(|node| node.text_key().is_some())
        .map(|node| node.id())
        .collect();

    assert_eq!(applied, expected);
}

#[test]
fn attach_then_detach_restores_the_container() {
    let localizer = Localizer::new(Store::bundled("en").unwrap());
    let container = Rc::new(Recorder::default());

    let mut existing = attach(&container, &localizer).unwrap();
    let before = container.children.borrow().clone();

    let mut handle = attach(&container, &localizer).unwrap();
    assert_eq!(container.children.borrow().len(), 2);

    handle.detach();
    assert_eq!(*container.children.borrow(), before);

    existing.detach();
    assert!(container.children.borrow().is_empty());
}

#[test]
fn detach_twice_is_a_single_detach() {
    let localizer = Localizer::new(Store::bundled("en").unwrap());
    let container = Rc::new(Recorder::default());
    let mut handle = attach(&container, &localizer).unwrap();
    let root = handle.widget_id().unwrap();

    handle.detach();
    handle.detach();
    drop(handle);

    assert_eq!(container.calls(), vec![Call::Insert(root), Call::Remove(root)]);
}

#[test]
fn same_container_gets_independent_subtrees() {
    let localizer = Localizer::new(Store::bundled("en").unwrap());
    let container = Rc::new(Recorder::default());

    let a = attach(&container, &localizer).unwrap();
    let b = attach(&container, &localizer).unwrap();

    assert_ne!(a.widget_id(), b.widget_id());
    assert_eq!(a.tree().len(), b.tree().len());
}

#[test]
fn destroyed_container_is_tolerated() {
    let localizer = Localizer::new(Store::bundled("en").unwrap());
    let container = Rc::new(Recorder::default());
    let mut handle = attach(&container, &localizer).unwrap();
    container.clear();

    container.destroyed.set(true);
    assert!(handle.container().is_none());

    localizer.localize(&mut handle, "fr").unwrap();
    handle.detach();

    assert!(container.calls().is_empty());
    assert_eq!(handle.state(), AttachState::Detached);
}

#[test]
fn dropped_container_is_tolerated() {
    let localizer = Localizer::new(Store::bundled("en").unwrap());
    let container = Rc::new(Recorder::default());
    let mut handle = attach(&container, &localizer).unwrap();

    drop(container);
    localizer.localize(&mut handle, "fr").unwrap();
    handle.detach();
    assert_eq!(handle.state(), AttachState::Detached);
}

#[test]
fn destroyed_container_cannot_be_attached() {
    let localizer = Localizer::new(Store::bundled("en").unwrap());
    let container = Rc::new(Recorder::default());
    container.destroyed.set(true);

    assert_eq!(
        attach(&container, &localizer).err(),
        Some(AttachError::InvalidContainer)
    );
    assert!(container.calls().is_empty());
}

#[test]
fn localizing_before_attach_is_pushed_on_insertion() {
    let localizer = Localizer::new(Store::bundled("en").unwrap());
    let container = Rc::new(Recorder::default());

    let mut handle = AttachmentHandle::new(&localizer).unwrap();
    localizer.localize(&mut handle, "fr").unwrap();
    assert!(container.calls().is_empty());

    handle.attach(&container).unwrap();
    assert_eq!(container.calls(), vec![Call::Insert(handle.widget_id().unwrap())]);

    let label = handle
        .tree()
        .visit(handle.root())
        .find_map(|node| node.text())
        .unwrap();
    assert_eq!(label, "Mises à jour automatiques");

    localizer.localize(&mut handle, "fr").unwrap();
    assert_eq!(container.calls().len(), 1);
}

#[test]
fn missing_key_surfaces_after_the_pass() {
    let localizer = Localizer::new(
        Store::load(
            r#"{ "btn.check": { "en": "Check for updates", "fr": "Vérifier les mises à jour" } }"#,
            "en",
        )
        .unwrap(),
    );

    let container = Rc::new(Recorder::default());
    let mut handle = attach(&container, &localizer).unwrap();
    let button = check_button(&handle);
    let _ = localizer.localize(&mut handle, "en");
    container.clear();

    let error = localizer.localize(&mut handle, "fr").unwrap_err();
    assert_eq!(error, UnknownKey(layout::KEYS[0].to_owned()));
    assert!(container
        .texts()
        .contains(&(button, String::from("Vérifier les mises à jour"))));
}

#[test]
fn desktop_localization_settles_after_one_pass() {
    let localizer = Localizer::new(scenario_store());
    let container = Rc::new(Recorder::default());
    let mut handle = attach(&container, &localizer).unwrap();

    let first = localizer.localize_desktop(&mut handle).unwrap();
    assert_eq!(first.locale, pop_system_updater_widget::locale::current());
    assert_eq!(first.visited, handle.tree().len());
    assert_eq!(container.texts().len(), first.applied);

    container.clear();
    let second = localizer.localize_desktop(&mut handle).unwrap();
    assert_eq!(second.locale, first.locale);
    assert_eq!(second.applied, 0);
    assert!(container.calls().is_empty());
}
