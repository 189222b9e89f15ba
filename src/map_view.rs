use engine::{
    ecs::Glyph,
    prelude::*,
};

/// Render the active map as seen by the player: live view inside the
/// field of view, remembered terrain and objects outside it, blank
/// shroud everywhere else.
pub fn show(r: &Runtime) -> String {
    let Some(player) = r.player() else {
        return String::new();
    };
    let Some(map) = r.active_map() else {
        return String::new();
    };
    let key = r.active_map_key();

    let mut view: Grid<char> =
        Grid::new(map.width(), map.height(), ' ');

    // Memory first, the live view draws over it.
    if let Some(mem) = player.remembers(r, key) {
        for (p, &id) in mem.tiles.iter() {
            if !id.is_void() && view.contains(p) {
                view[p] = r.tiles.get(id).ch;
            }
        }
        for (pos, e) in &mem.objs {
            if view.contains(pos.0) {
                view[pos.0] = e.glyph(r).ch;
            }
        }
    }

    let fov = player.active_fov(r);
    if fov.map == key {
        for (p, &lit) in fov.visible.iter() {
            if lit && view.contains(p) {
                view[p] = r.tiles.get(map.tiles()[p]).ch;
            }
        }
        for (pos, Glyph { ch, .. }) in r.drawables_on(key) {
            if fov.visible.get(pos.0).copied().unwrap_or(false) {
                view[pos.0] = ch;
            }
        }
    }

    let mut out = String::new();
    for y in 0..view.height() {
        for x in 0..view.width() {
            out.push(view[[x, y]]);
        }
        out.push('\n');
    }
    out
}
