use cb_core::{text, ResourceSlot, RESOURCE_LANGUAGE, UNCONFIGURED_CONDITION, VERIFY_YES};
use std::{env, fs, path::PathBuf};

/// What an unconfigured stub carries in each slot. The builder overwrites all six.
fn placeholder(slot: ResourceSlot) -> Vec<u8> {
    match slot {
        ResourceSlot::PrereqData | ResourceSlot::PrimaryData => vec![0],
        ResourceSlot::PrereqName | ResourceSlot::PrimaryName => text::encode_utf16le("unset"),
        ResourceSlot::Condition => text::encode_utf16le(UNCONFIGURED_CONDITION),
        ResourceSlot::Verify => text::encode_utf16le(VERIFY_YES),
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    if env::var("CARGO_CFG_TARGET_OS").unwrap_or_default() != "windows" {
        return;
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap_or_default());
    let mut res = winres::WindowsResource::new();

    res.set("FileDescription", "Chain Boot Bootstrapper");
    res.set("ProductName", "Chain Boot");
    res.set("CompanyName", "ShineeKun");
    res.set("FileVersion", "1.0.0.0");
    res.set("ProductVersion", "1.0.0.0");
    res.set(
        "LegalCopyright",
        "Copyright © 2025 ShineeKun. All Rights Reserved.",
    );
    res.set("OriginalFilename", "cb-stub.exe");

    res.set_manifest(r#"
<assembly xmlns="urn:schemas-microsoft-com:asm.v1" manifestVersion="1.0">
  <assemblyIdentity type="win32" name="ChainBoot.Stub" version="1.0.0.0" processorArchitecture="*" />

  <trustInfo xmlns="urn:schemas-microsoft-com:asm.v3">
    <security>
      <requestedPrivileges>
        <requestedExecutionLevel level="asInvoker" uiAccess="false" />
      </requestedPrivileges>
    </security>
  </trustInfo>

  <compatibility xmlns="urn:schemas-microsoft-com:compatibility.v1">
    <application>
      <supportedOS Id="{8e0f7a12-bfb3-4fe8-b9a5-48fd50a15a9a}"/>
    </application>
  </compatibility>
</assembly>
"#);

    // CUSTOM slots, compiled with the language the builder writes with so an
    // update replaces them in place.
    let mut rc = format!(
        "\nLANGUAGE 0x{:02X}, 0x{:02X}\n",
        RESOURCE_LANGUAGE & 0x3FF,
        RESOURCE_LANGUAGE >> 10
    );
    for slot in ResourceSlot::ALL {
        let file = out_dir.join(format!("slot_{}.bin", slot.id()));
        if let Err(e) = fs::write(&file, placeholder(slot)) {
            panic!("Cannot write placeholder for {}: {}", slot, e);
        }
        rc.push_str(&format!(
            "{} {} \"{}\"\n",
            slot.id(),
            slot.resource_type(),
            file.display().to_string().replace('\\', "\\\\")
        ));
    }
    res.append_rc_content(&rc);

    if let Err(e) = res.compile() {
        panic!("Resource Compile Error: {}", e);
    }
}
