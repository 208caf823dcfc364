//! Build script for DupManager
//!
//! Windows: embeds the application manifest for long path support (>260 chars).
//!
//! Quarantined files mirror their original directory structure underneath
//! the quarantine folder, so destination paths are always longer than the
//! source path. The manifest (`dupmanager.manifest`) sets `longPathAware=true`
//! which, combined with the Windows 10 v1607+ registry setting, enables
//! paths up to 32,767 characters.

fn main() {
    #[cfg(windows)]
    {
        embed_resource::compile("dupmanager.rc", embed_resource::NONE);

        println!("cargo:rerun-if-changed=dupmanager.rc");
        println!("cargo:rerun-if-changed=dupmanager.manifest");
    }
}
