use cb_core::{RESOURCE_LANGUAGE, RESOURCE_TYPE, STUB_RESOURCE_ID};
use std::{env, path::Path};

const EMBED_VAR: &str = "CHAINBOOT_EMBED_STUB";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed={}", EMBED_VAR);

    if env::var("CARGO_CFG_TARGET_OS").unwrap_or_default() != "windows" {
        return;
    }

    let mut res = winres::WindowsResource::new();

    res.set("FileDescription", "Chain Boot Bootstrapper Builder");
    res.set("ProductName", "Chain Boot");
    res.set("CompanyName", "ShineeKun");
    res.set("FileVersion", "1.0.0.0");
    res.set("ProductVersion", "1.0.0.0");
    res.set(
        "LegalCopyright",
        "Copyright © 2025 ShineeKun. All Rights Reserved.",
    );
    res.set("OriginalFilename", "cb-builder.exe");

    // Pack a built cb-stub.exe so the builder ships as a single file.
    if let Ok(stub) = env::var(EMBED_VAR) {
        let stub = Path::new(&stub);
        if !stub.is_file() {
            panic!("{} points at a missing stub: {:?}", EMBED_VAR, stub);
        }
        println!("cargo:rerun-if-changed={}", stub.display());

        res.append_rc_content(&format!(
            "\nLANGUAGE 0x{:02X}, 0x{:02X}\n{} {} \"{}\"\n",
            RESOURCE_LANGUAGE & 0x3FF,
            RESOURCE_LANGUAGE >> 10,
            STUB_RESOURCE_ID,
            RESOURCE_TYPE,
            stub.display().to_string().replace('\\', "\\\\")
        ));
    } else {
        println!("cargo:warning=⚠️ {} not set, cb-builder will look for cb-stub.exe beside itself", EMBED_VAR);
    }

    if let Err(e) = res.compile() {
        panic!("Resource Compile Error: {}", e);
    }
}
