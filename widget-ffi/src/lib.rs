// Copyright 2021-2022 System76 <info@system76.com>
// SPDX-License-Identifier: MPL-2.0

#[macro_use]
extern crate tracing;

use pop_system_updater_widget::{
    locale, AttachmentHandle, HostContainer, Localizer, NodeRef, WidgetId,
};
use slotmap::{new_key_type, Key, KeyData, SlotMap};
use std::cell::RefCell;
use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;
use std::ptr;
use std::rc::Rc;

/// Capabilities of a host container, supplied by the caller.
///
/// Every function is called on the thread which attached the widget, and
/// must not call back into this library.
#[repr(C)]
#[derive(Copy, Clone)]
pub struct PopHostContainer {
    pub user_data: *mut c_void,
    pub is_live: Option<unsafe extern "C" fn(user_data: *mut c_void) -> bool>,
    /// Called once per node, parents first. The root has a parent of 0.
    pub insert_child: Option<
        unsafe extern "C" fn(
            user_data: *mut c_void,
            widget: u64,
            parent: u64,
            kind: u32,
            text: *const c_char,
        ),
    >,
    pub remove_child: Option<unsafe extern "C" fn(user_data: *mut c_void, widget: u64)>,
    pub set_text: Option<unsafe extern "C" fn(user_data: *mut c_void, widget: u64, text: *const c_char)>,
}

type IsLive = unsafe extern "C" fn(*mut c_void) -> bool;
type InsertChild = unsafe extern "C" fn(*mut c_void, u64, u64, u32, *const c_char);
type RemoveChild = unsafe extern "C" fn(*mut c_void, u64);
type SetText = unsafe extern "C" fn(*mut c_void, u64, *const c_char);

/// Adapts a [`PopHostContainer`] function table to [`HostContainer`].
struct CHost {
    user_data: *mut c_void,
    is_live: IsLive,
    insert_child: InsertChild,
    remove_child: RemoveChild,
    set_text: SetText,
}

impl CHost {
    fn new(table: &PopHostContainer) -> Option<Self> {
        Some(Self {
            user_data: table.user_data,
            is_live: table.is_live?,
            insert_child: table.insert_child?,
            remove_child: table.remove_child?,
            set_text: table.set_text?,
        })
    }

    fn insert(&self, node: NodeRef<'_>, parent: u64) {
        let text = node.text().and_then(c_string);
        let text_ptr = text.as_ref().map_or(ptr::null(), |text| text.as_ptr());

        unsafe {
            (self.insert_child)(self.user_data, node.id().0, parent, node.kind() as u32, text_ptr);
        }

        for child in node.children() {
            self.insert(child, node.id().0);
        }
    }
}

impl HostContainer for CHost {
    fn is_live(&self) -> bool {
        unsafe { (self.is_live)(self.user_data) }
    }

    fn insert_child(&self, root: NodeRef<'_>) {
        self.insert(root, 0);
    }

    fn remove_child(&self, root: WidgetId) {
        unsafe { (self.remove_child)(self.user_data, root.0) }
    }

    fn set_text(&self, node: WidgetId, text: &str) {
        if let Some(text) = c_string(text) {
            unsafe { (self.set_text)(self.user_data, node.0, text.as_ptr()) }
        }
    }
}

fn c_string(text: &str) -> Option<CString> {
    match CString::new(text) {
        Ok(text) => Some(text),
        Err(why) => {
            error!("cannot pass text with an interior nul to the host: {}", why);
            None
        }
    }
}

new_key_type! {
    struct AttachmentKey;
}

/// A handle attached through the C ABI, together with the host it was
/// attached to. The handle only holds the host weakly.
struct Attachment {
    handle: AttachmentHandle,
    _host: Rc<CHost>,
}

#[derive(Default)]
struct State {
    localizer: Option<Localizer>,
    attachments: SlotMap<AttachmentKey, Attachment>,
}

impl State {
    fn localizer(&mut self) -> Option<&Localizer> {
        if self.localizer.is_none() {
            match pop_system_updater_widget::localizer() {
                Ok(localizer) => self.localizer = Some(localizer),
                Err(why) => error!("failed to load system updater translations: {}", why),
            }
        }

        self.localizer.as_ref()
    }

    fn localize_all(&mut self, locale: &str) {
        locale::set_current(locale);

        if self.localizer().is_none() {
            return;
        }

        let State {
            localizer,
            attachments,
        } = self;

        if let Some(localizer) = localizer.as_ref() {
            for (_, attachment) in attachments.iter_mut() {
                if let Err(why) = localizer.localize(&mut attachment.handle, locale) {
                    error!("failed to localize system updater widget: {}", why);
                }
            }
        }
    }
}

thread_local! {
    static STATE: RefCell<State> = RefCell::default();
}

fn with_state<T>(func: impl FnOnce(&mut State) -> T) -> Option<T> {
    STATE.with(|state| match state.try_borrow_mut() {
        Ok(mut state) => Some(func(&mut state)),
        Err(_) => {
            error!("system updater widget was called from within a host callback");
            None
        }
    })
}

/// Localizes the system-updater widget strings to the desktop's language.
///
/// Applies to every widget attached on this thread, and to widgets attached
/// afterwards.
#[no_mangle]
pub extern "C" fn pop_system_updater_localize() {
    with_state(|state| {
        let locale = locale::requested()
            .or_else(|| state.localizer().map(|l| l.store().fallback().to_owned()));

        if let Some(locale) = locale {
            state.localize_all(&locale);
        }
    });
}

/// Localizes the system-updater widget strings to `locale`.
///
/// # Safety
///
/// The locale must be null or a valid nul-terminated string.
#[no_mangle]
pub unsafe extern "C" fn pop_system_updater_localize_to(locale: *const c_char) {
    if locale.is_null() {
        error!("cannot localize system updater widget to a null locale");
        return;
    }

    let locale = CStr::from_ptr(locale).to_string_lossy().into_owned();
    with_state(|state| state.localize_all(&locale));
}

/// Creates and attaches the system-updater widget to the container.
///
/// Returns a handle for [`pop_system_updater_detach`], or 0 on failure.
///
/// # Safety
///
/// The container must be null or point to a valid function table, whose
/// functions remain callable until the widget is detached.
#[no_mangle]
pub unsafe extern "C" fn pop_system_updater_attach(container: *const PopHostContainer) -> u64 {
    let host = match container.as_ref().and_then(CHost::new) {
        Some(host) => Rc::new(host),
        None => {
            error!("cannot attach system updater widget to null container");
            return 0;
        }
    };

    with_state(|state| {
        let localizer = state.localizer()?;
        let result = pop_system_updater_widget::attach(&host, localizer);

        match result {
            Ok(handle) => {
                let key = state.attachments.insert(Attachment {
                    handle,
                    _host: host,
                });

                Some(key.data().as_ffi())
            }

            Err(why) => {
                error!("cannot attach system updater widget: {}", why);
                None
            }
        }
    })
    .flatten()
    .unwrap_or(0)
}

/// Detaches and frees a widget created by [`pop_system_updater_attach`].
///
/// Unknown or already detached handles are ignored.
#[no_mangle]
pub extern "C" fn pop_system_updater_detach(handle: u64) {
    let key = AttachmentKey::from(KeyData::from_ffi(handle));

    let attachment = with_state(|state| state.attachments.remove(key)).flatten();

    // Dropping detaches; done outside of the state borrow since it calls
    // into the host.
    drop(attachment);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct Host {
        live: Cell<bool>,
        inserted: RefCell<Vec<(u64, u64, u32, Option<String>)>>,
        removed: RefCell<Vec<u64>>,
        texts: RefCell<Vec<(u64, String)>>,
    }

    unsafe fn host<'a>(data: *mut c_void) -> &'a Host {
        &*(data as *const Host)
    }

    unsafe fn text(text: *const c_char) -> Option<String> {
        if text.is_null() {
            None
        } else {
            Some(CStr::from_ptr(text).to_string_lossy().into_owned())
        }
    }

    unsafe extern "C" fn is_live(data: *mut c_void) -> bool {
        host(data).live.get()
    }

    unsafe extern "C" fn insert_child(
        data: *mut c_void,
        widget: u64,
        parent: u64,
        kind: u32,
        label: *const c_char,
    ) {
        host(data)
            .inserted
            .borrow_mut()
            .push((widget, parent, kind, text(label)));
    }

    unsafe extern "C" fn remove_child(data: *mut c_void, widget: u64) {
        host(data).removed.borrow_mut().push(widget);
    }

    unsafe extern "C" fn set_text(data: *mut c_void, widget: u64, label: *const c_char) {
        if let Some(label) = text(label) {
            host(data).texts.borrow_mut().push((widget, label));
        }
    }

    fn table(host: &Host) -> PopHostContainer {
        PopHostContainer {
            user_data: host as *const Host as *mut c_void,
            is_live: Some(is_live),
            insert_child: Some(insert_child),
            remove_child: Some(remove_child),
            set_text: Some(set_text),
        }
    }

    #[test]
    fn null_container_is_rejected() {
        assert_eq!(unsafe { pop_system_updater_attach(ptr::null()) }, 0);

        let host = Host::default();
        let table = PopHostContainer {
            set_text: None,
            ..table(&host)
        };
        assert_eq!(unsafe { pop_system_updater_attach(&table) }, 0);
    }

    #[test]
    fn dead_container_is_rejected() {
        let host = Host::default();
        assert_eq!(unsafe { pop_system_updater_attach(&table(&host)) }, 0);
        assert!(host.inserted.borrow().is_empty());
    }

    #[test]
    fn attach_localize_detach() {
        let host = Host::default();
        host.live.set(true);

        unsafe { pop_system_updater_localize_to(b"en\0".as_ptr() as *const c_char) };
        let handle = unsafe { pop_system_updater_attach(&table(&host)) };
        assert_ne!(handle, 0);

        let root = {
            let inserted = host.inserted.borrow();
            assert_eq!(inserted[0].1, 0);
            assert!(inserted[1..].iter().all(|(_, parent, _, _)| *parent != 0));
            assert!(inserted
                .iter()
                .any(|(_, _, _, text)| text.as_deref() == Some("Check for updates")));
            inserted[0].0
        };

        unsafe { pop_system_updater_localize_to(b"fr\0".as_ptr() as *const c_char) };
        assert!(host
            .texts
            .borrow()
            .iter()
            .any(|(_, text)| text == "Vérifier les mises à jour"));

        pop_system_updater_detach(handle);
        pop_system_updater_detach(handle);
        assert_eq!(*host.removed.borrow(), vec![root]);
    }

    #[test]
    fn desktop_localization_only_pushes_changes() {
        let host = Host::default();
        host.live.set(true);

        let handle = unsafe { pop_system_updater_attach(&table(&host)) };
        assert_ne!(handle, 0);

        pop_system_updater_localize();
        {
            let inserted = host.inserted.borrow();
            let texts = host.texts.borrow();
            assert!(texts
                .iter()
                .all(|(widget, _)| inserted.iter().any(|(id, ..)| id == widget)));
        }

        host.texts.borrow_mut().clear();
        pop_system_updater_localize();
        assert!(host.texts.borrow().is_empty());

        let root = host.inserted.borrow()[0].0;
        pop_system_updater_detach(handle);
        assert_eq!(*host.removed.borrow(), vec![root]);
        assert!(with_state(|state| state.attachments.is_empty()).unwrap());
    }
}

