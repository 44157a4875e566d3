fn main() {
    tank_arena::game::run();
}
