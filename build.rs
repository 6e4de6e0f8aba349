fn main() {
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .emit_rerun_if_changed(false)
        .type_attribute(
            ".catalog",
            "#[derive(serde::Serialize, serde::Deserialize)]",
        )
        .compile_protos(&["proto/catalog.proto"], &["proto"])
        .unwrap();
}
