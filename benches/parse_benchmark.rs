use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use printmeta::{parse_3mf, parse_duration, parse_gcode};
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Generate a Bambu-style 3MF project with the given number of filaments and mesh vertices
fn generate_3mf(filaments: usize, vertices: usize) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    let mut model_xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<model unit="millimeter" xml:lang="en-US" xmlns="http://schemas.microsoft.com/3dmanufacturing/core/2015/02">
    <resources>
        <basematerials id="1">
"#,
    );
    for i in 0..filaments {
        model_xml.push_str(&format!(
            "            <base name=\"Filament {}\" displaycolor=\"#{:06X}\"/>\n",
            i,
            (i * 0x1F3D5B) & 0xFFFFFF
        ));
    }
    model_xml.push_str(
        r#"        </basematerials>
        <object id="2" type="model">
            <mesh>
                <vertices>
"#,
    );

    // Vertices in a grid pattern, so the model document dominates the archive
    for i in 0..vertices {
        model_xml.push_str(&format!(
            "                    <vertex x=\"{}\" y=\"{}\" z=\"0\"/>\n",
            i % 100,
            i / 100
        ));
    }
    model_xml.push_str(
        r#"                </vertices>
                <triangles/>
            </mesh>
        </object>
    </resources>
    <build>
        <item objectid="2"/>
    </build>
</model>"#,
    );

    zip.start_file("3D/3dmodel.model", options).unwrap();
    zip.write_all(model_xml.as_bytes()).unwrap();

    let colours: Vec<_> = (0..filaments).map(|i| format!("\"#{:06X}\"", i * 1000)).collect();
    let types: Vec<_> = (0..filaments).map(|_| "\"PLA\"".to_string()).collect();
    let settings = format!(
        "{{\"filament_colour\": [{}], \"filament_type\": [{}]}}",
        colours.join(","),
        types.join(",")
    );
    zip.start_file("Metadata/project_settings.config", options).unwrap();
    zip.write_all(settings.as_bytes()).unwrap();

    let mut manifest = String::from("<config><plate><metadata key=\"prediction\" value=\"5025\"/>");
    for i in 0..filaments {
        manifest.push_str(&format!(
            "<filament id=\"{}\" type=\"PLA\" color=\"#{:06X}\" used_m=\"1.5\" used_g=\"4.2\"/>",
            i + 1,
            i * 1000
        ));
    }
    manifest.push_str("</plate></config>");
    zip.start_file("Metadata/slice_info.config", options).unwrap();
    zip.write_all(manifest.as_bytes()).unwrap();

    zip.finish().unwrap().into_inner()
}

/// Generate a PrusaSlicer-style G-code file with a header and `moves` lines of machine code
fn generate_gcode(moves: usize) -> String {
    let mut gcode = String::from(
        "; generated by PrusaSlicer 2.6.1+win64 on 2023-09-12 at 08:15:02 UTC\n\
         ; filament used [mm] = 1234.56, 789.01\n\
         ; filament used [g] = 3.70, 2.35\n\
         ; filament_type = PLA;PETG\n\
         ; filament_colour = #FF8000;#808080\n\
         ; temperature = 215,240\n\
         ; estimated printing time (normal mode) = 1h 23m 45s\n",
    );
    for i in 0..moves {
        gcode.push_str(&format!("G1 X{} Y{} E0.05\n", i % 200, (i / 200) % 200));
    }
    gcode
}

fn bench_parse_3mf(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_3mf");

    for &(filaments, vertices) in &[(1, 1000), (4, 10_000), (16, 100_000)] {
        let bytes = generate_3mf(filaments, vertices);

        group.bench_with_input(
            BenchmarkId::new("filaments_vertices", format!("{}f_{}v", filaments, vertices)),
            &bytes,
            |b, bytes| {
                b.iter(|| black_box(parse_3mf("bench.3mf", Cursor::new(bytes.as_slice())).unwrap()));
            },
        );
    }

    group.finish();
}

fn bench_parse_gcode(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_gcode");

    for &moves in &[100, 100_000] {
        let gcode = generate_gcode(moves);

        group.bench_with_input(BenchmarkId::new("moves", moves), &gcode, |b, gcode| {
            b.iter(|| black_box(parse_gcode("bench.gcode", Cursor::new(gcode.as_bytes())).unwrap()));
        });
    }

    group.finish();
}

fn bench_parse_duration(c: &mut Criterion) {
    c.bench_function("parse_duration", |b| {
        b.iter(|| {
            black_box(parse_duration(black_box("1d 2h 3m 4s")));
            black_box(parse_duration(black_box("1:23:45")));
        });
    });
}

criterion_group!(benches, bench_parse_3mf, bench_parse_gcode, bench_parse_duration);
criterion_main!(benches);
