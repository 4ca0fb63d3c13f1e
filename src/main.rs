use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use rsp_inspect::gains::GainLogReader;
use rsp_inspect::samples::{Channels, SampleReader, SampleStats};
use rsp_inspect::wav::{ChunkBody, ChunkEvent, ChunkSize, CivilTime, WavReader};

/// Inspect the binary artifacts of SDRplay RSP recordings
#[derive(Parser, Debug)]
#[command(name = "rsp-inspect")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the metadata chunks of a WAV/RF64 I/Q recording
    Wav {
        /// Recording to inspect
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Show the events of a gain-change log
    Gains {
        /// Gain log written alongside a recording
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Summarize a raw I/Q sample stream
    Samples {
        /// Raw sample file; reads stdin when omitted
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
        /// Number of interleaved tuner channels (1 or 2)
        #[arg(short, long, default_value = "1")]
        channels: u8,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    match args.command {
        Command::Wav { file } => show_wav(&file),
        Command::Gains { file } => show_gains(&file),
        Command::Samples { file, channels } => {
            let channels = match channels {
                1 => Channels::Single,
                2 => Channels::Dual,
                n => {
                    eprintln!("Error: Invalid number of channels '{}'. Use: 1 or 2", n);
                    std::process::exit(1);
                }
            };
            show_samples(file.as_deref(), channels)
        }
    }
}

fn show_wav(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let mut reader = WavReader::new(BufReader::new(file))?;

    let header = reader.header();
    println!("Header Chunk ID : {}", header.id);
    println!("Header Chunk Size : {}", header.size);
    println!("Header Chunk Format : {}", header.format);
    println!();

    while let Some(event) = reader.next_chunk()? {
        match event {
            ChunkEvent::Chunk { header, body } => {
                println!("Chunk ID : {}", header.id);
                println!("Chunk Size : {}", header.size);
                print_body(&body);
                println!();
            }
            ChunkEvent::Data { header, size } => {
                println!("Chunk ID : {}", header.id);
                println!("Chunk Size : {}", header.size);
                if header.size == ChunkSize::Unknown {
                    match size {
                        Some(n) => println!("Data Size : {}", n),
                        None => println!("Data Size : (no ds64 chunk seen)"),
                    }
                }
            }
            ChunkEvent::Garbage(garbage) => {
                eprintln!("warning: {}", garbage);
            }
        }
    }
    Ok(())
}

fn print_body(body: &ChunkBody) {
    match body {
        ChunkBody::Format(format) => {
            match format.format_name() {
                Some(name) => println!("Format Code : {} ({})", format.format_code, name),
                None => println!("Format Code : {}", format.format_code),
            }
            println!("Number of Channels : {}", format.channels);
            println!("Sample Rate : {}", format.sample_rate);
            println!("Byte Rate : {}", format.byte_rate);
            println!("Block Align : {}", format.block_align);
            println!("Sample Width : {}", format.bits_per_sample);
        }
        ChunkBody::Ds64(ds64) => {
            println!("RIFF Size : {}", ds64.riff_size);
            println!("Data Size : {}", ds64.data_size);
            println!("Sample Count : {}", ds64.sample_count);
            println!("Table Length : {}", ds64.table_length);
        }
        ChunkBody::Auxi(auxi) => {
            let info = auxi.info();
            print_time("Start Time", &info.start_time);
            print_time("Stop Time", &info.stop_time);
            println!("Center Freq : {}", info.center_freq);
            println!("AD Frequency : {}", info.ad_frequency);
            println!("IF Frequency : {}", info.if_frequency);
            println!("Bandwidth : {}", info.bandwidth);
            println!("IQ Offset : {}", info.iq_offset);
            println!("DB Offset : {} ({:#x})", info.db_offset, info.db_offset);
            println!("Max Val : {}", info.max_val);
            println!("Unused4 : {}", info.unused4);
            println!("Unused5 : {}", info.unused5);
            if let Some(next_file) = auxi.next_file() {
                println!("Next File : {}", next_file);
            }
        }
        ChunkBody::Markers(markers) => {
            for marker in markers {
                println!(
                    "Marker : flags={:#x} sample_offset={} byte_offset={} label={:?}",
                    marker.flags, marker.sample_offset, marker.byte_offset, marker.label
                );
            }
        }
        ChunkBody::Junk => {}
        ChunkBody::BadLength {
            id,
            expected,
            actual,
        } => {
            eprintln!(
                "warning: '{}' chunk body is {} bytes, expected {}",
                id, actual, expected
            );
        }
        ChunkBody::Skipped => {}
    }
}

fn print_time(label: &str, time: &CivilTime) {
    match time.to_datetime() {
        Some(datetime) => println!("{} : {}", label, datetime),
        None => println!("{} : (not set)", label),
    }
}

fn show_gains(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let mut reader = GainLogReader::new(BufReader::new(file));
    while let Some(event) = reader.next_event()? {
        println!(
            "sample_num={} currGain={:.3} tuner={} gRdB={} lnaGRdB={}",
            event.sample_num,
            event.current_gain,
            event.tuner,
            event.gain_reduction_db,
            event.lna_gain_reduction_db
        );
    }
    Ok(())
}

fn show_samples(path: Option<&Path>, channels: Channels) -> Result<(), Box<dyn std::error::Error>> {
    let inner: Box<dyn Read> = match path {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };
    let mut reader = SampleReader::new(inner, channels);
    let mut stats = SampleStats::new(channels);

    let outcome = loop {
        match reader.next_frame() {
            Ok(Some(frame)) => stats.update(&frame),
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        }
    };

    // Stats go to stderr so the stream itself can keep flowing through a
    // pipeline on stdout.
    eprintln!("count: {}", stats.frames);
    match stats.b {
        None => {
            eprintln!("I range: {} {}", stats.a.i_min, stats.a.i_max);
            eprintln!("Q range: {} {}", stats.a.q_min, stats.a.q_max);
        }
        Some(b) => {
            eprintln!("IA range: {} {}", stats.a.i_min, stats.a.i_max);
            eprintln!("QA range: {} {}", stats.a.q_min, stats.a.q_max);
            eprintln!("IB range: {} {}", b.i_min, b.i_max);
            eprintln!("QB range: {} {}", b.q_min, b.q_max);
        }
    }

    outcome?;
    Ok(())
}
