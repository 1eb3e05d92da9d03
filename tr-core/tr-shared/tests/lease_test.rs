use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tr_shared::{FakeSerialIo, SharedSerial};

#[test_log::test]
fn test_leases_serialize_concurrent_exchanges() {
    let fake = FakeSerialIo::new();
    let serial = SharedSerial::new(Box::new(fake.clone()));

    let (held_tx, held_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();

    let first = {
        let serial = serial.clone();
        thread::spawn(move || {
            let mut lease = serial.lease().unwrap();
            lease.write_all(b"first-a").unwrap();
            held_tx.send(()).unwrap();
            release_rx.recv().unwrap();
            lease.write_all(b"first-b").unwrap();
        })
    };

    held_rx.recv().unwrap();
    let second = {
        let serial = serial.clone();
        thread::spawn(move || {
            serial.lease().unwrap().write_all(b"second").unwrap();
        })
    };

    // Give the second thread time to block on the lease.
    thread::sleep(Duration::from_millis(50));
    release_tx.send(()).unwrap();

    first.join().unwrap();
    second.join().unwrap();

    let writes = fake.writes();
    assert_eq!(
        writes,
        vec![b"first-a".to_vec(), b"first-b".to_vec(), b"second".to_vec()]
    );
    assert!(!serial.is_leased());
}

#[test_log::test]
fn test_auto_read_resumes_after_panicking_exchange() {
    let serial = SharedSerial::new(Box::new(FakeSerialIo::new()));
    let _rx = serial.start_auto_read(Duration::from_millis(5));

    let worker = {
        let serial = serial.clone();
        thread::spawn(move || {
            let _lease = serial.lease().unwrap();
            panic!("exchange blew up");
        })
    };
    assert!(worker.join().is_err());

    assert!(!serial.is_leased());
    assert!(serial.is_auto_read_enabled());

    // A poisoned port is still leasable.
    serial.lease().unwrap().write_all(&[0x64, 0x55]).unwrap();
    serial.stop_auto_read();
}
