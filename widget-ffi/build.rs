use std::{env, fs::File, io::Write, os::unix::prelude::OsStrExt, path::PathBuf};

fn main() {
    cdylib_link_lines::metabuild();

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let target_dir = out_dir
        .ancestors()
        .find(|dir| dir.as_os_str().as_bytes().ends_with(b"target"))
        .unwrap_or(out_dir.as_path());

    let pkg_config = format!(
        include_str!("pop_system_updater_widget.pc.in"),
        name = "pop_system_updater_widget",
        description = env::var("CARGO_PKG_DESCRIPTION").unwrap(),
        version = env::var("CARGO_PKG_VERSION").unwrap()
    );

    std::fs::create_dir_all(target_dir).unwrap();

    File::create(target_dir.join("pop_system_updater_widget.pc.stub"))
        .expect("failed to create pc.stub")
        .write_all(pkg_config.as_bytes())
        .expect("failed to write pc.stub");
}
