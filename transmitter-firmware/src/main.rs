#![no_std]
#![no_main]

mod console;
mod serial;

use assign_resources::assign_resources;
#[cfg(feature = "simulated-humidity")]
use climate_transmitter_core::drivers::DriftingHumiditySensor;
use climate_transmitter_core::{
    Acquisition, AcquisitionConfig,
    drivers::{Bmp280, bmp280},
};
#[cfg(not(feature = "simulated-humidity"))]
use climate_transmitter_core::drivers::Aht20;
use core::cell::RefCell;
use defmt::{info, unwrap};
#[cfg(not(feature = "simulated-humidity"))]
use defmt::warn;
use defmt_rtt as _;
use embassy_embedded_hal::shared_bus::blocking::i2c::I2cDevice;
use embassy_executor::Spawner;
use embassy_rp::{
    Peri,
    gpio::{Level, Output},
    i2c::{self, Blocking, I2c},
    peripherals::{self, I2C1},
};
use embassy_sync::blocking_mutex::{Mutex, raw::NoopRawMutex};
use embassy_time::{Delay, Duration};
#[cfg(feature = "panic-probe")]
use panic_probe as _;
use portable_atomic as _;
use static_cell::StaticCell;

assign_resources! {
    status: StatusResources {
        led: PIN_25,
    },
    telemetry: TelemetryResources {
        uart: UART0,
        tx_pin: PIN_0,
    },
    sensors: SensorResources {
        i2c: I2C1,
        sda_pin: PIN_2,
        scl_pin: PIN_3,
    },
}

const SENSOR_BUS_FREQUENCY: u32 = 400_000;

type SensorBus = Mutex<NoopRawMutex, RefCell<I2c<'static, I2C1, Blocking>>>;

static SENSOR_BUS: StaticCell<SensorBus> = StaticCell::new();

#[cfg(not(feature = "panic-probe"))]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    let p = unsafe { embassy_rp::Peripherals::steal() };
    let r = split_resources!(p);

    let mut led = Output::new(r.status.led, Level::Low);

    loop {
        // Blink the on-board LED pretty fast
        led.toggle();

        embassy_time::block_for(Duration::from_millis(50));
    }
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    let r = split_resources!(p);

    info!("Climate transmitter {}", git_version::git_version!());

    // Solid LED while running, blinking means something went very wrong
    let _status_led = Output::new(r.status.led, Level::High);

    let serial = serial::UartSerial::new(r.telemetry);

    let mut bus_config = i2c::Config::default();
    bus_config.frequency = SENSOR_BUS_FREQUENCY;
    let bus = I2c::new_blocking(
        r.sensors.i2c,
        r.sensors.scl_pin,
        r.sensors.sda_pin,
        bus_config,
    );
    let bus: &'static SensorBus = SENSOR_BUS.init(Mutex::new(RefCell::new(bus)));

    let mut pressure_sensor = Bmp280::new(I2cDevice::new(bus), bmp280::DEFAULT_ADDRESS);
    unwrap!(pressure_sensor.init());
    let calibration = unwrap!(pressure_sensor.read_calibration());
    info!("Pressure sensor calibration: {}", calibration);

    #[cfg(not(feature = "simulated-humidity"))]
    let humidity_sensor = {
        let mut sensor = Aht20::new(I2cDevice::new(bus), Delay);

        // The sensor stays in use regardless, a failed read only degrades the frame
        if let Err(e) = sensor.reset() {
            warn!("Humidity sensor reset failed: {}", e);
        }
        if let Err(e) = sensor.init() {
            warn!("Humidity sensor init failed: {}", e);
        }

        sensor
    };

    #[cfg(feature = "simulated-humidity")]
    let humidity_sensor = {
        info!("Using simulated humidity sensor");
        DriftingHumiditySensor::default()
    };

    let mut acquisition = Acquisition::new(
        pressure_sensor,
        humidity_sensor,
        serial,
        console::DefmtConsole,
        Delay,
        calibration,
        AcquisitionConfig::default(),
    );
    info!("Acquisition config: {}", acquisition.config());

    acquisition.run()
}
