//! Renders a small clock-face icon.ico at build time and embeds it in the Windows executable

/// Dial ring and hands
const INK: [u8; 4] = [40, 40, 40, 255];
/// Dial fill
const PAPER: [u8; 4] = [250, 250, 250, 255];
/// Second hand
const RED: [u8; 4] = [220, 30, 30, 255];

/// Distance from point (px, py) to segment (0,0)-(ex, ey)
fn segment_distance(px: f32, py: f32, ex: f32, ey: f32) -> f32 {
    let len2 = ex * ex + ey * ey;
    let t = ((px * ex + py * ey) / len2).clamp(0.0, 1.0);
    let (dx, dy) = (px - t * ex, py - t * ey);
    (dx * dx + dy * dy).sqrt()
}

/// Clock showing 10:10 (hands as (angle from 12 o'clock, length ratio, width ratio, color))
fn make_rgba_clock(size: u32) -> Vec<u8> {
    let s = size as f32;
    let c = s * 0.5;
    let r = s * 0.46;
    let ring = (s * 0.07).max(1.0);
    let hands: [(f32, f32, f32, [u8; 4]); 3] = [
        (305.0_f32.to_radians(), 0.50, 0.08, INK),
        (60.0_f32.to_radians(), 0.75, 0.06, INK),
        (180.0_f32.to_radians(), 0.80, 0.03, RED),
    ];

    let mut rgba = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let dx = (x as f32) + 0.5 - c;
            let dy = (y as f32) + 0.5 - c;
            let d = (dx * dx + dy * dy).sqrt();
            let mut px = if d > r {
                [0, 0, 0, 0]
            } else if d > r - ring {
                INK
            } else {
                PAPER
            };
            if d <= r - ring {
                for (angle, len, width, color) in hands {
                    let (ex, ey) = (angle.sin() * r * len, -angle.cos() * r * len);
                    if segment_distance(dx, dy, ex, ey) <= (s * width * 0.5).max(0.6) {
                        px = color;
                    }
                }
            }
            rgba.extend_from_slice(&px);
        }
    }
    rgba
}

fn main() {
    #[cfg(windows)]
    {
        let manifest_dir = std::path::PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap());
        let icon_path = manifest_dir.join("icon.ico");

        let mut icon_dir = ico::IconDir::new(ico::ResourceType::Icon);
        for &size in &[16u32, 32u32, 48u32, 64u32] {
            let rgba = make_rgba_clock(size);
            let image = ico::IconImage::from_rgba_data(size, size, rgba);
            let entry = ico::IconDirEntry::encode(&image).expect("encode icon entry");
            icon_dir.add_entry(entry);
        }

        let mut file = std::fs::File::create(&icon_path).expect("create icon.ico");
        icon_dir.write(&mut file).expect("write icon.ico");

        let mut res = winres::WindowsResource::new();
        res.set_icon("icon.ico");
        if let Err(e) = res.compile() {
            eprintln!("winres: {} (no Windows SDK/rc.exe? the exe will ship without an icon)", e);
        }
    }
}
