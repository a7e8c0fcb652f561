fn main() -> anyhow::Result<()> {
    tmx_standardizer::run()
}
