fn main() -> nih_plug_xtask::Result<()> {
    // `cargo xtask bundle multi_filter --release`
    nih_plug_xtask::main()
}
