fn main() {
    skyfire::game::run();
}
