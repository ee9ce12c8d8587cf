fn main() {
    kudu::run("config.json");
}
