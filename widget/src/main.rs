// SPDX-License-Identifier: MPL-2.0
// Copyright © 2021 System76

//! Attaches the updater widget to a console host and walks it through the
//! locales given on the command line.
//!
//! ```text
//! pop-system-updater-widget fr es de
//! pop-system-updater-widget --dump
//! ```

use pop_system_updater_widget::{attach, HostContainer, NodeRef, WidgetId, WidgetKind};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

pub const APP_ID: &str = "com.system76.UpgradeManager";

/// Prints realized widgets and text changes to stdout.
#[derive(Default)]
struct ConsoleHost {
    closed: Cell<bool>,
    kinds: RefCell<HashMap<WidgetId, WidgetKind>>,
}

impl ConsoleHost {
    fn print(&self, node: NodeRef<'_>, depth: usize) {
        self.kinds.borrow_mut().insert(node.id(), node.kind());

        println!(
            "{:indent$}{:?} {:?}{}",
            "",
            node.kind(),
            node.id(),
            node.text().map(|text| format!(": {}", text)).unwrap_or_default(),
            indent = depth * 2
        );

        for child in node.children() {
            self.print(child, depth + 1);
        }
    }
}

impl HostContainer for ConsoleHost {
    fn is_live(&self) -> bool {
        !self.closed.get()
    }

    fn insert_child(&self, root: NodeRef<'_>) {
        self.print(root, 0);
    }

    fn remove_child(&self, root: WidgetId) {
        println!("removed {:?}", root);
        self.kinds.borrow_mut().clear();
    }

    fn set_text(&self, node: WidgetId, text: &str) {
        let kind = self.kinds.borrow().get(&node).copied();
        println!("  {:?} {:?} = {}", kind, node, text);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let localizer = match pop_system_updater_widget::localizer() {
        Ok(localizer) => localizer,
        Err(why) => {
            eprintln!("{}: failed to load translations: {}", APP_ID, why);
            std::process::exit(1);
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|arg| arg == "--dump") {
        match localizer.store().to_resource() {
            Ok(resource) => println!("{}", resource),
            Err(why) => eprintln!("{}: failed to render translations: {}", APP_ID, why),
        }

        return;
    }

    let host = Rc::new(ConsoleHost::default());

    let mut handle = match attach(&host, &localizer) {
        Ok(handle) => handle,
        Err(why) => {
            eprintln!("{}: {}", APP_ID, why);
            std::process::exit(1);
        }
    };

    for locale in &args {
        println!("localize {}", locale);
        if let Err(why) = localizer.localize(&mut handle, locale) {
            eprintln!("{}: {}", APP_ID, why);
        }
    }

    handle.detach();
}
